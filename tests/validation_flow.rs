//! Integration tests for the full validation and lifecycle flow.
//!
//! These tests exercise the engine end to end through the in-memory
//! store: validate an action, record the usage, move tenants through
//! their lifecycle, and check that each stage sees the state the
//! previous one left behind.

use std::sync::Arc;

use lubricore::adapters::memory::InMemoryTenantStore;
use lubricore::application::handlers::{
    ActivateSubscriptionCommand, ActivateSubscriptionHandler, CreateTrialCommand,
    CreateTrialHandler, ExtendTrialCommand, ExtendTrialHandler, RecordUsageCommand,
    RecordUsageHandler, ResolveLimitsHandler, ResolveLimitsQuery, SweepExpiredHandler,
    ValidateActionHandler, ValidateActionQuery,
};
use lubricore::domain::access::{
    AccountStatus, ActionKind, DenialKind, Principal, Role, SuggestedAction,
};
use lubricore::domain::entitlement::{EntitlementResolver, TrialPolicy};
use lubricore::domain::foundation::{PlanId, PrincipalId, TenantId, Timestamp};
use lubricore::domain::plan::PlanCatalog;
use lubricore::domain::tenant::{RenewalType, TenantState};
use lubricore::ports::TenantStore;

// =============================================================================
// Test Infrastructure
// =============================================================================

struct Engine {
    store: Arc<InMemoryTenantStore>,
    create_trial: CreateTrialHandler,
    activate: ActivateSubscriptionHandler,
    extend_trial: ExtendTrialHandler,
    validate: ValidateActionHandler,
    record_usage: RecordUsageHandler,
    resolve_limits: ResolveLimitsHandler,
    sweep: SweepExpiredHandler,
}

impl Engine {
    fn new() -> Self {
        let store = Arc::new(InMemoryTenantStore::new());
        let catalog = Arc::new(PlanCatalog::standard());
        let trial = TrialPolicy::default();
        let resolver = EntitlementResolver::new(Arc::clone(&catalog), trial);

        Self {
            create_trial: CreateTrialHandler::new(
                Arc::clone(&store) as Arc<dyn TenantStore>,
                trial,
            ),
            activate: ActivateSubscriptionHandler::new(
                Arc::clone(&store) as Arc<dyn TenantStore>,
                catalog,
            ),
            extend_trial: ExtendTrialHandler::new(Arc::clone(&store) as Arc<dyn TenantStore>),
            validate: ValidateActionHandler::new(
                Arc::clone(&store) as Arc<dyn TenantStore>,
                resolver.clone(),
            ),
            record_usage: RecordUsageHandler::new(
                Arc::clone(&store) as Arc<dyn TenantStore>,
                resolver.clone(),
            ),
            resolve_limits: ResolveLimitsHandler::new(
                Arc::clone(&store) as Arc<dyn TenantStore>,
                resolver,
            ),
            sweep: SweepExpiredHandler::new(Arc::clone(&store) as Arc<dyn TenantStore>),
            store,
        }
    }

    async fn onboard(&self, name: &str) -> TenantId {
        self.create_trial
            .handle(CreateTrialCommand {
                name: name.to_string(),
            })
            .await
            .unwrap()
            .id
    }
}

fn employee(tenant_id: TenantId) -> Principal {
    Principal {
        id: PrincipalId::new("emp-1").unwrap(),
        role: Role::User,
        account_status: AccountStatus::Active,
        tenant_id: Some(tenant_id),
    }
}

fn admin(tenant_id: TenantId) -> Principal {
    Principal {
        id: PrincipalId::new("owner-1").unwrap(),
        role: Role::Admin,
        account_status: AccountStatus::Active,
        tenant_id: Some(tenant_id),
    }
}

fn create_service(principal: Principal) -> ValidateActionQuery {
    ValidateActionQuery {
        tenant_id: principal.tenant_id,
        principal: Some(principal),
        action: ActionKind::CreateService,
    }
}

// =============================================================================
// Trial flow
// =============================================================================

#[tokio::test]
async fn trial_tenant_can_work_until_quota_then_gets_denied() {
    let engine = Engine::new();
    let tenant_id = engine.onboard("Lubricentro San Martín").await;

    // Burn through the whole trial allowance.
    for used in 0..10 {
        let decision = engine.validate.handle(create_service(employee(tenant_id))).await;
        assert!(decision.is_valid(), "denied at {} used", used);
        assert!(engine
            .record_usage
            .handle(RecordUsageCommand { tenant_id })
            .await
            .unwrap());
    }

    // The eleventh service is over quota.
    let decision = engine.validate.handle(create_service(employee(tenant_id))).await;
    assert_eq!(decision.error_kind(), Some(DenialKind::QuotaExceeded));
    let denial = decision.denial().unwrap();
    assert_eq!(denial.suggested_action, Some(SuggestedAction::ContactSupport));
    let snapshot = denial.details.as_ref().unwrap();
    assert_eq!(snapshot.current, 10);
    assert_eq!(snapshot.max, Some(10));

    // And the recorder refuses it as well.
    assert!(!engine
        .record_usage
        .handle(RecordUsageCommand { tenant_id })
        .await
        .unwrap());
}

#[tokio::test]
async fn one_remaining_unit_shows_in_resolved_limits() {
    let engine = Engine::new();
    let tenant_id = engine.onboard("Lubricentro Centro").await;

    for _ in 0..9 {
        engine
            .record_usage
            .handle(RecordUsageCommand { tenant_id })
            .await
            .unwrap();
    }

    let limits = engine
        .resolve_limits
        .handle(ResolveLimitsQuery { tenant_id })
        .await
        .unwrap();

    assert_eq!(limits.current_services, 9);
    assert_eq!(limits.remaining_services(), Some(1));
    assert!(limits.can_add_services);

    let decision = engine.validate.handle(create_service(employee(tenant_id))).await;
    assert!(decision.is_valid());
}

// =============================================================================
// Activation flow
// =============================================================================

#[tokio::test]
async fn activation_resets_usage_and_opens_plan_quota() {
    let engine = Engine::new();
    let tenant_id = engine.onboard("Lubricentro Norte").await;

    for _ in 0..7 {
        engine
            .record_usage
            .handle(RecordUsageCommand { tenant_id })
            .await
            .unwrap();
    }

    let activated = engine
        .activate
        .handle(ActivateSubscriptionCommand {
            tenant_id,
            plan_id: PlanId::new("starter").unwrap(),
            renewal: RenewalType::Monthly,
        })
        .await
        .unwrap();

    assert_eq!(activated.state, TenantState::Active);
    assert_eq!(activated.services_used_this_month, 0);

    let limits = engine
        .resolve_limits
        .handle(ResolveLimitsQuery { tenant_id })
        .await
        .unwrap();
    assert_eq!(limits.plan_name, "Starter");
    assert_eq!(limits.max_services, Some(50));
    assert_eq!(limits.current_services, 0);
}

#[tokio::test]
async fn starter_user_quota_blocks_second_seat() {
    let engine = Engine::new();
    let tenant_id = engine.onboard("Lubricentro Sur").await;

    engine
        .activate
        .handle(ActivateSubscriptionCommand {
            tenant_id,
            plan_id: PlanId::new("starter").unwrap(),
            renewal: RenewalType::Monthly,
        })
        .await
        .unwrap();

    // Fill the seats out of band; the engine reads, never writes, this count.
    let mut tenant = engine.store.get(&tenant_id).await.unwrap().unwrap();
    tenant.active_user_count = 2;
    engine.store.update(&tenant).await.unwrap();

    let decision = engine
        .validate
        .handle(ValidateActionQuery {
            tenant_id: Some(tenant_id),
            principal: Some(admin(tenant_id)),
            action: ActionKind::CreateUser,
        })
        .await;

    assert_eq!(decision.error_kind(), Some(DenialKind::QuotaExceeded));
    assert_eq!(
        decision.denial().unwrap().suggested_action,
        Some(SuggestedAction::UpgradePlan)
    );
}

// =============================================================================
// Concurrency
// =============================================================================

#[tokio::test]
async fn concurrent_usage_never_overshoots_the_plan_ceiling() {
    let engine = Engine::new();
    let tenant_id = engine.onboard("Lubricentro Oeste").await;

    engine
        .activate
        .handle(ActivateSubscriptionCommand {
            tenant_id,
            plan_id: PlanId::new("starter").unwrap(),
            renewal: RenewalType::Monthly,
        })
        .await
        .unwrap();

    let mut handles = Vec::new();
    for _ in 0..80 {
        let store = Arc::clone(&engine.store) as Arc<dyn TenantStore>;
        let resolver = EntitlementResolver::new(
            Arc::new(PlanCatalog::standard()),
            TrialPolicy::default(),
        );
        handles.push(tokio::spawn(async move {
            RecordUsageHandler::new(store, resolver)
                .handle(RecordUsageCommand { tenant_id })
                .await
                .unwrap()
        }));
    }

    let mut admitted = 0;
    for handle in handles {
        if handle.await.unwrap() {
            admitted += 1;
        }
    }

    assert_eq!(admitted, 50);
    let limits = engine
        .resolve_limits
        .handle(ResolveLimitsQuery { tenant_id })
        .await
        .unwrap();
    assert_eq!(limits.current_services, 50);
}

// =============================================================================
// Expiry and sweep
// =============================================================================

#[tokio::test]
async fn sweep_deactivates_lapsed_tenant_and_trial_extension_revives_it() {
    let engine = Engine::new();
    let now = Timestamp::now();
    let tenant_id = engine.onboard("Lubricentro Lapsed").await;

    engine
        .activate
        .handle(ActivateSubscriptionCommand {
            tenant_id,
            plan_id: PlanId::new("plus").unwrap(),
            renewal: RenewalType::Monthly,
        })
        .await
        .unwrap();

    // Rewind the paid period so it ended last week.
    let mut tenant = engine.store.get(&tenant_id).await.unwrap().unwrap();
    tenant.subscription_end_date = Some(now.minus_days(7));
    engine.store.update(&tenant).await.unwrap();

    let outcome = engine.sweep.handle(now).await.unwrap();
    assert_eq!(outcome.deactivated, 1);

    let decision = engine.validate.handle(create_service(employee(tenant_id))).await;
    assert!(!decision.is_valid());

    // Support gives the shop another trial week.
    let revived = engine
        .extend_trial
        .handle(ExtendTrialCommand {
            tenant_id,
            additional_days: 7,
        })
        .await
        .unwrap();
    assert_eq!(revived.state, TenantState::Trial);

    let decision = engine.validate.handle(create_service(employee(tenant_id))).await;
    assert!(decision.is_valid());
}

#[tokio::test]
async fn lapsed_active_tenant_is_denied_even_before_the_sweep_runs() {
    let engine = Engine::new();
    let now = Timestamp::now();
    let tenant_id = engine.onboard("Lubricentro Pending Sweep").await;

    engine
        .activate
        .handle(ActivateSubscriptionCommand {
            tenant_id,
            plan_id: PlanId::new("plus").unwrap(),
            renewal: RenewalType::Monthly,
        })
        .await
        .unwrap();

    let mut tenant = engine.store.get(&tenant_id).await.unwrap().unwrap();
    tenant.subscription_end_date = Some(now.minus_days(1));
    engine.store.update(&tenant).await.unwrap();

    let decision = engine.validate.handle(create_service(employee(tenant_id))).await;
    assert_eq!(decision.error_kind(), Some(DenialKind::SubscriptionExpired));
}

// =============================================================================
// Superadmin
// =============================================================================

#[tokio::test]
async fn superadmin_passes_without_any_tenant_state() {
    let engine = Engine::new();

    let decision = engine
        .validate
        .handle(ValidateActionQuery {
            principal: Some(Principal {
                id: PrincipalId::new("platform-op").unwrap(),
                role: Role::Superadmin,
                account_status: AccountStatus::Active,
                tenant_id: None,
            }),
            tenant_id: None,
            action: ActionKind::AdminAction,
        })
        .await;

    assert!(decision.is_valid());
}
