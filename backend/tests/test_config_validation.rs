//! Tests for configuration validation
//!
//! Malformed inputs must be rejected before any simulation work starts.

use queue_simulator_core_rs::{ArrivalGeneration, SimulationError, Simulator, SimulatorConfig};

fn create_valid_config() -> SimulatorConfig {
    SimulatorConfig {
        horizon: 100.0,
        server_count: 2,
        routing_probabilities: vec![0.25, 0.75],
        arrival_rate: 1.0,
        buffer_capacities: vec![1, 3],
        service_rates: vec![2.0, 2.0],
        rng_seed: 12345,
        arrival_generation: ArrivalGeneration::Eager,
        record_events: false,
    }
}

fn assert_invalid(config: SimulatorConfig) {
    let result = Simulator::new(config);
    assert!(
        matches!(result, Err(SimulationError::InvalidConfig(_))),
        "expected InvalidConfig"
    );
}

#[test]
fn test_valid_config_accepted() {
    assert!(create_valid_config().validate().is_ok());
    assert!(Simulator::new(create_valid_config()).is_ok());
}

#[test]
fn test_zero_arrival_rate_rejected() {
    let mut config = create_valid_config();
    config.arrival_rate = 0.0;
    assert_invalid(config);
}

#[test]
fn test_negative_and_nan_arrival_rate_rejected() {
    let mut config = create_valid_config();
    config.arrival_rate = -1.0;
    assert_invalid(config.clone());

    config.arrival_rate = f64::NAN;
    assert_invalid(config);
}

#[test]
fn test_rates_with_overflowing_draws_rejected() {
    // Subnormal: 1 / rate is already infinite
    assert_invalid(SimulatorConfig::single_server(10.0, 1e-310, 1, 2.0));
    assert_invalid(SimulatorConfig::single_server(10.0, 1.0, 1, 1e-310));

    // Normal, but the largest exponential draw (~36.7 / rate) overflows
    assert_invalid(SimulatorConfig::single_server(10.0, 1e-307, 1, 2.0));
    assert_invalid(SimulatorConfig::single_server(10.0, 1.0, 1, 1e-307));
}

#[test]
fn test_tiny_normal_rate_accepted() {
    let config = SimulatorConfig::single_server(10.0, 1e-300, 1, 2.0);
    assert!(config.validate().is_ok());
}

#[test]
fn test_non_positive_horizon_rejected() {
    for horizon in [0.0, -5.0, f64::INFINITY, f64::NAN] {
        let mut config = create_valid_config();
        config.horizon = horizon;
        assert_invalid(config);
    }
}

#[test]
fn test_zero_servers_rejected() {
    let config = SimulatorConfig {
        server_count: 0,
        routing_probabilities: vec![],
        buffer_capacities: vec![],
        service_rates: vec![],
        ..create_valid_config()
    };
    assert_invalid(config);
}

#[test]
fn test_length_mismatch_rejected() {
    let mut config = create_valid_config();
    config.service_rates = vec![2.0];
    assert_invalid(config);

    let mut config = create_valid_config();
    config.buffer_capacities = vec![1, 2, 3];
    assert_invalid(config);

    let mut config = create_valid_config();
    config.routing_probabilities = vec![1.0];
    assert_invalid(config);
}

#[test]
fn test_probabilities_must_sum_to_one() {
    let mut config = create_valid_config();
    config.routing_probabilities = vec![0.5, 0.4];
    assert_invalid(config);
}

#[test]
fn test_rounding_in_probability_sum_tolerated() {
    let config = SimulatorConfig {
        server_count: 3,
        routing_probabilities: vec![0.1, 0.2, 0.7],
        buffer_capacities: vec![0, 0, 0],
        service_rates: vec![1.0, 1.0, 1.0],
        ..create_valid_config()
    };
    assert!(config.validate().is_ok());
}

#[test]
fn test_negative_probability_rejected() {
    let mut config = create_valid_config();
    config.routing_probabilities = vec![-0.5, 1.5];
    assert_invalid(config);
}

#[test]
fn test_non_positive_service_rate_rejected() {
    let mut config = create_valid_config();
    config.service_rates = vec![2.0, 0.0];
    assert_invalid(config);

    let mut config = create_valid_config();
    config.service_rates = vec![-1.0, 2.0];
    assert_invalid(config);
}

#[test]
fn test_error_message_names_the_field() {
    let mut config = create_valid_config();
    config.service_rates = vec![2.0];

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("service_rates"), "{}", err);
}

#[test]
fn test_json_config_defaults() {
    let json = r#"{
        "horizon": 50.0,
        "server_count": 1,
        "routing_probabilities": [1.0],
        "arrival_rate": 0.5,
        "buffer_capacities": [4],
        "service_rates": [1.0]
    }"#;

    let config = SimulatorConfig::from_json_str(json).unwrap();
    assert_eq!(config.rng_seed, 12345);
    assert_eq!(config.arrival_generation, ArrivalGeneration::Eager);
    assert!(!config.record_events);
    assert_eq!(config.buffer_capacities, vec![4]);
}

#[test]
fn test_json_config_lazy_mode() {
    let json = r#"{
        "horizon": 50.0,
        "server_count": 1,
        "routing_probabilities": [1.0],
        "arrival_rate": 0.5,
        "buffer_capacities": [0],
        "service_rates": [1.0],
        "rng_seed": 7,
        "arrival_generation": "lazy",
        "record_events": true
    }"#;

    let config = SimulatorConfig::from_json_str(json).unwrap();
    assert_eq!(config.rng_seed, 7);
    assert_eq!(config.arrival_generation, ArrivalGeneration::Lazy);
    assert!(config.record_events);
}

#[test]
fn test_json_config_validated_after_parse() {
    let json = r#"{
        "horizon": 50.0,
        "server_count": 1,
        "routing_probabilities": [1.0],
        "arrival_rate": 0.0,
        "buffer_capacities": [0],
        "service_rates": [1.0]
    }"#;

    assert!(matches!(
        SimulatorConfig::from_json_str(json),
        Err(SimulationError::InvalidConfig(_))
    ));
}

#[test]
fn test_malformed_json_rejected() {
    assert!(matches!(
        SimulatorConfig::from_json_str("{ not json"),
        Err(SimulationError::ConfigParse(_))
    ));

    // Negative capacity does not fit usize
    let json = r#"{
        "horizon": 50.0,
        "server_count": 1,
        "routing_probabilities": [1.0],
        "arrival_rate": 1.0,
        "buffer_capacities": [-1],
        "service_rates": [1.0]
    }"#;
    assert!(matches!(
        SimulatorConfig::from_json_str(json),
        Err(SimulationError::ConfigParse(_))
    ));
}

#[test]
fn test_missing_config_file_rejected() {
    let result = SimulatorConfig::from_json_file("/nonexistent/queue-sim-config.json");
    assert!(matches!(result, Err(SimulationError::ConfigParse(_))));
}
