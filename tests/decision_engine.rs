use std::collections::BTreeSet;
use std::path::Path;

use autodeploy_cli::analyzer::{
    AnalysisResult, DatabaseType, Framework, Language, PortSource, analyze_repository,
};
use autodeploy_cli::error::{AutodeployError, DecisionError};
use autodeploy_cli::infrastructure::{
    InfrastructureDecision, StrategyRule, SubnetPlan, decide, fired_rule_from_reasoning,
};
use autodeploy_cli::requirements::{
    CloudProvider, DeploymentRequirements, DeploymentStrategy, RequirementParser, RuleBasedParser,
    ScalingConfig,
};
use proptest::prelude::*;

const FIXTURES: &str = "tests/fixtures/apps";

fn fixture(name: &str) -> AnalysisResult {
    analyze_repository(&Path::new(FIXTURES).join(name))
        .unwrap_or_else(|e| panic!("{}: analysis failed: {}", name, e))
}

#[test]
fn postgres_app_goes_to_containers_with_private_subnets() {
    let analysis = fixture("flask-postgres");
    let requirements = DeploymentRequirements::default().with_provider(CloudProvider::Aws);

    let decision = decide(&analysis, &requirements).unwrap();

    assert_eq!(decision.deployment_strategy, DeploymentStrategy::Container);
    assert_eq!(decision.networking.subnet_plan, SubnetPlan::PublicPrivate);
    assert!(decision.networking.vpc_needed);
    let database = decision.database.as_ref().expect("database sized");
    assert_eq!(database.engine, DatabaseType::Postgresql);
    assert!(database.managed);
    assert!(decision.estimated_cost.total_cents > 0);
    assert_eq!(decision.estimated_cost.currency, "USD");
}

#[test]
fn serverless_request_for_listening_server_is_incompatible() {
    let analysis = fixture("flask");
    let requirements =
        DeploymentRequirements::default().with_deployment_type(DeploymentStrategy::Serverless);

    let err = decide(&analysis, &requirements).unwrap_err();
    assert!(matches!(
        err,
        AutodeployError::Decision(DecisionError::IncompatibleRequirements { .. })
    ));
}

#[test]
fn serverless_request_for_handler_is_honored() {
    let analysis = fixture("lambda-handler");
    let requirements = RuleBasedParser::new()
        .parse("Run this as a serverless function on AWS", &analysis)
        .unwrap();

    let decision = decide(&analysis, &requirements).unwrap();
    assert_eq!(decision.deployment_strategy, DeploymentStrategy::Serverless);
    assert_eq!(decision.strategy_rule, StrategyRule::ExplicitRequest);
    assert!(!decision.networking.vpc_needed);
}

#[test]
fn description_drives_provider_region_and_services() {
    let analysis = fixture("express-redis");
    let requirements = RuleBasedParser::new()
        .parse(
            "Deploy to GCP in us-central1 with auto-scaling from 2 to 6 instances, SSL and a CDN",
            &analysis,
        )
        .unwrap();
    assert_eq!(requirements.cloud_provider, CloudProvider::Gcp);
    assert!(requirements.scaling.enabled);

    let decision = decide(&analysis, &requirements).unwrap();
    assert_eq!(decision.provider, CloudProvider::Gcp);
    assert_eq!(decision.region, "us-central1");
    assert!(decision.networking.ssl);
    assert!(decision.networking.load_balancer);
    assert_eq!(decision.compute_resources.min_instances, 2);
    assert_eq!(decision.compute_resources.max_instances, 6);
    assert_eq!(fired_rule_from_reasoning(&decision.reasoning), Some(decision.strategy_rule));
}

#[test]
fn compose_project_is_containerized() {
    let decision = decide(&fixture("django-compose"), &DeploymentRequirements::default()).unwrap();
    assert_eq!(decision.deployment_strategy, DeploymentStrategy::Container);
    assert_eq!(decision.strategy_rule, StrategyRule::StatefulApp);
}

fn base_analysis() -> AnalysisResult {
    AnalysisResult {
        app_type: "express".to_string(),
        framework: Some(Framework::Express),
        language: Language::JavaScript,
        dependencies: Default::default(),
        entry_point: Some("server.js".to_string()),
        build_command: Some("npm ci".to_string()),
        start_command: Some("node server.js".to_string()),
        port: 3000,
        port_source: PortSource::FrameworkDefault,
        environment_vars: BTreeSet::new(),
        requires_database: false,
        database_type: None,
        requires_redis: false,
        requires_docker: false,
        dockerfile_present: false,
        docker_compose_present: false,
        compose_services: Vec::new(),
        static_files: false,
        serverless_handler: false,
        confidence_score: 0.9,
        warnings: Vec::new(),
        files_analyzed: 3,
    }
}

fn arb_database() -> impl Strategy<Value = Option<DatabaseType>> {
    prop_oneof![
        Just(None),
        Just(Some(DatabaseType::Postgresql)),
        Just(Some(DatabaseType::Mysql)),
        Just(Some(DatabaseType::Mongodb)),
        Just(Some(DatabaseType::Sqlite)),
    ]
}

fn arb_framework() -> impl Strategy<Value = Option<Framework>> {
    prop_oneof![
        Just(None),
        Just(Some(Framework::Express)),
        Just(Some(Framework::Flask)),
        Just(Some(Framework::Spring)),
        Just(Some(Framework::React)),
    ]
}

prop_compose! {
    fn arb_analysis()(
        framework in arb_framework(),
        database in arb_database(),
        redis in any::<bool>(),
        compose in any::<bool>(),
        handler in any::<bool>(),
        static_files in any::<bool>(),
        confidence in 0.0f64..=1.0,
    ) -> AnalysisResult {
        let mut analysis = base_analysis();
        analysis.framework = framework;
        analysis.app_type = framework
            .map(|f| f.as_str().to_string())
            .unwrap_or_else(|| "generic-javascript".to_string());
        if framework == Some(Framework::Spring) {
            analysis.language = Language::Java;
        }
        analysis.requires_database = database.is_some();
        analysis.database_type = database;
        analysis.requires_redis = redis;
        analysis.docker_compose_present = compose;
        analysis.requires_docker = compose;
        analysis.serverless_handler = handler;
        analysis.static_files = static_files;
        analysis.confidence_score = (confidence * 1000.0).round() / 1000.0;
        analysis
    }
}

fn arb_services() -> impl Strategy<Value = BTreeSet<String>> {
    proptest::sample::subsequence(
        vec!["redis", "queue", "storage", "cdn", "monitoring", "high_availability", "database"],
        0..=4,
    )
    .prop_map(|names| names.into_iter().map(String::from).collect())
}

fn arb_provider() -> impl Strategy<Value = CloudProvider> {
    prop_oneof![
        Just(CloudProvider::Aws),
        Just(CloudProvider::Gcp),
        Just(CloudProvider::Azure),
    ]
}

fn arb_deployment_type() -> impl Strategy<Value = Option<DeploymentStrategy>> {
    proptest::option::of(proptest::sample::select(DeploymentStrategy::ALL.to_vec()))
}

fn arb_instance_type() -> impl Strategy<Value = Option<String>> {
    proptest::option::of(
        proptest::sample::select(vec![
            "t3.medium",
            "fargate-1vcpu-2gb",
            "e2-small",
            "Standard_B2s",
            "lambda-512mb",
            "quantum-xl",
        ])
        .prop_map(String::from),
    )
}

prop_compose! {
    fn arb_requirements()(
        provider in arb_provider(),
        services in arb_services(),
        ssl in any::<bool>(),
        domain in proptest::option::of(Just("app.example.com".to_string())),
        deployment_type in arb_deployment_type(),
        instance_type in arb_instance_type(),
    ) -> DeploymentRequirements {
        DeploymentRequirements {
            cloud_provider: provider,
            additional_services: services,
            ssl_required: ssl,
            custom_domain: domain,
            deployment_type,
            instance_type,
            ..Default::default()
        }
    }
}

/// Decide, turning the one legitimate refusal (serverless for a persistent server)
/// into a rejected case and any other error into a failure.
fn decide_accepted(
    analysis: &AnalysisResult,
    requirements: &DeploymentRequirements,
) -> Result<InfrastructureDecision, TestCaseError> {
    match decide(analysis, requirements) {
        Ok(decision) => Ok(decision),
        Err(AutodeployError::Decision(DecisionError::IncompatibleRequirements { .. }))
            if requirements.deployment_type == Some(DeploymentStrategy::Serverless) =>
        {
            Err(TestCaseError::reject("serverless refused for a persistent server"))
        }
        Err(e) => Err(TestCaseError::fail(e.to_string())),
    }
}

proptest! {
    #[test]
    fn decision_is_deterministic(analysis in arb_analysis(), requirements in arb_requirements()) {
        let first = decide_accepted(&analysis, &requirements)?;
        let second = decide_accepted(&analysis, &requirements)?;
        prop_assert_eq!(
            serde_json::to_string(&first).unwrap(),
            serde_json::to_string(&second).unwrap()
        );
    }

    #[test]
    fn only_serverless_for_a_persistent_server_is_refused(
        analysis in arb_analysis(),
        requirements in arb_requirements(),
    ) {
        let refused = decide(&analysis, &requirements).is_err();
        let expected = requirements.deployment_type == Some(DeploymentStrategy::Serverless)
            && analysis.is_persistent_server()
            && !analysis.serverless_handler;
        prop_assert_eq!(refused, expected);
    }

    #[test]
    fn database_present_iff_required(analysis in arb_analysis(), requirements in arb_requirements()) {
        let decision = decide_accepted(&analysis, &requirements)?;
        prop_assert_eq!(decision.database.is_some(), analysis.requires_database);
        if analysis.requires_database || analysis.requires_redis {
            prop_assert_eq!(decision.networking.subnet_plan, SubnetPlan::PublicPrivate);
        }
    }

    #[test]
    fn required_database_never_goes_to_vm(
        analysis in arb_analysis(),
        requirements in arb_requirements(),
    ) {
        prop_assume!(analysis.requires_database);
        prop_assume!(requirements.deployment_type.is_none());
        let decision = decide_accepted(&analysis, &requirements)?;
        prop_assert_ne!(decision.deployment_strategy, DeploymentStrategy::Vm);
        prop_assert!(decision.networking.vpc_needed);
    }

    #[test]
    fn explicit_request_always_wins(analysis in arb_analysis(), requirements in arb_requirements()) {
        prop_assume!(requirements.deployment_type.is_some());
        let decision = decide_accepted(&analysis, &requirements)?;
        prop_assert_eq!(Some(decision.deployment_strategy), requirements.deployment_type);
        prop_assert_eq!(decision.strategy_rule, StrategyRule::ExplicitRequest);
    }

    #[test]
    fn reasoning_names_exactly_the_fired_rule(
        analysis in arb_analysis(),
        requirements in arb_requirements(),
    ) {
        let decision = decide_accepted(&analysis, &requirements)?;
        prop_assert_eq!(fired_rule_from_reasoning(&decision.reasoning), Some(decision.strategy_rule));
        let fired = decision.reasoning.iter().filter(|l| l.contains(": fired -> ")).count();
        prop_assert_eq!(fired, 1);
    }

    #[test]
    fn enabling_scaling_never_decreases_cost(
        analysis in arb_analysis(),
        requirements in arb_requirements(),
        min in 1u32..=4,
        extra in 0u32..=6,
    ) {
        let with_scaling = |enabled| DeploymentRequirements {
            scaling: ScalingConfig { enabled, min, max: min + extra },
            ..requirements.clone()
        };
        let fixed = decide_accepted(&analysis, &with_scaling(false))?;
        let scaled = decide_accepted(&analysis, &with_scaling(true))?;

        prop_assert_eq!(scaled.deployment_strategy, fixed.deployment_strategy);
        prop_assert!(
            scaled.estimated_cost.total_cents >= fixed.estimated_cost.total_cents,
            "{} cents with scaling on, {} cents with it off",
            scaled.estimated_cost.total_cents,
            fixed.estimated_cost.total_cents
        );
    }

    #[test]
    fn load_balancer_follows_scaling_and_ssl(
        analysis in arb_analysis(),
        requirements in arb_requirements(),
        enabled in any::<bool>(),
        min in 1u32..=4,
        extra in 0u32..=6,
    ) {
        let requirements = DeploymentRequirements {
            scaling: ScalingConfig { enabled, min, max: min + extra },
            ..requirements
        };
        let decision = decide_accepted(&analysis, &requirements)?;
        let compute = &decision.compute_resources;

        prop_assert_eq!(
            decision.networking.load_balancer,
            compute.auto_scaling || (requirements.ssl_required && compute.min_instances > 1)
        );
        if decision.networking.load_balancer {
            prop_assert!(
                compute.auto_scaling || decision.deployment_strategy != DeploymentStrategy::Vm
            );
        }
        if decision.deployment_strategy == DeploymentStrategy::Vm && compute.auto_scaling {
            prop_assert!(requirements.ssl_required);
        }
    }

    #[test]
    fn cost_breakdown_sums_to_total(analysis in arb_analysis(), requirements in arb_requirements()) {
        let decision = decide_accepted(&analysis, &requirements)?;
        let sum: u64 = decision.estimated_cost.breakdown.iter().map(|i| i.monthly_cents).sum();
        prop_assert_eq!(sum, decision.estimated_cost.total_cents);
    }
}
