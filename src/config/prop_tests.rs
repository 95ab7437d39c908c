use super::*;
use crate::test_utils::arb_messy_string;
use proptest::prelude::*;

/// Generates an arbitrary Config
fn arb_config() -> impl Strategy<Value = Config> {
    (
        arb_messy_string(),
        arb_messy_string(),
        arb_messy_string(),
        0u64..100_000,
        prop::option::of(arb_messy_string()),
    )
        .prop_map(|(database_url, bind_address, jwt_secret, token_ttl_minutes, log_dir)| Config {
            database_url,
            bind_address,
            jwt_secret,
            token_ttl_minutes,
            log_dir: log_dir.map(PathBuf::from),
        })
}

/// Generates an arbitrary ConfigUpdate
fn arb_config_update() -> impl Strategy<Value = ConfigUpdate> {
    (
        prop::option::of(arb_messy_string()),
        prop::option::of(arb_messy_string()),
        prop::option::of(arb_messy_string()),
        prop::option::of(0u64..100_000),
        prop::option::of(arb_messy_string()),
    )
        .prop_map(|(database_url, bind_address, jwt_secret, token_ttl_minutes, log_dir)| ConfigUpdate {
            database_url,
            bind_address,
            jwt_secret,
            token_ttl_minutes,
            log_dir: log_dir.map(PathBuf::from),
            server_url: None,
        })
}

proptest! {
    /// Identity: apply_update(default) leaves the config unchanged
    #[test]
    fn prop_apply_default_is_identity(config in arb_config()) {
        let before = config.clone();
        let after = config.apply_update(ConfigUpdate::default());

        prop_assert_eq!(after.database_url, before.database_url);
        prop_assert_eq!(after.bind_address, before.bind_address);
        prop_assert_eq!(after.jwt_secret, before.jwt_secret);
        prop_assert_eq!(after.token_ttl_minutes, before.token_ttl_minutes);
        prop_assert_eq!(after.log_dir, before.log_dir);
    }

    /// Every Some field of the update wins, every None field keeps the old value
    #[test]
    fn prop_apply_update_field_wise(config in arb_config(), update in arb_config_update()) {
        let before = config.clone();
        let expected_url = update.database_url.clone().unwrap_or(before.database_url.clone());
        let expected_bind = update.bind_address.clone().unwrap_or(before.bind_address.clone());
        let expected_secret = update.jwt_secret.clone().unwrap_or(before.jwt_secret.clone());
        let expected_ttl = update.token_ttl_minutes.unwrap_or(before.token_ttl_minutes);
        let expected_log = update.log_dir.clone().or(before.log_dir.clone());

        let after = config.apply_update(update);

        prop_assert_eq!(after.database_url, expected_url);
        prop_assert_eq!(after.bind_address, expected_bind);
        prop_assert_eq!(after.jwt_secret, expected_secret);
        prop_assert_eq!(after.token_ttl_minutes, expected_ttl);
        prop_assert_eq!(after.log_dir, expected_log);
    }

    /// Applying the same update twice is the same as applying it once
    #[test]
    fn prop_apply_update_idempotent(config in arb_config(), update in arb_config_update()) {
        let once = config.clone().apply_update(update.clone());
        let twice = config.apply_update(update.clone()).apply_update(update);

        prop_assert_eq!(once.database_url, twice.database_url);
        prop_assert_eq!(once.token_ttl_minutes, twice.token_ttl_minutes);
        prop_assert_eq!(once.log_dir, twice.log_dir);
    }

    /// token_ttl is always the configured minutes in seconds
    #[test]
    fn prop_token_ttl_matches_minutes(config in arb_config()) {
        prop_assert_eq!(config.token_ttl().as_secs(), config.token_ttl_minutes * 60);
    }
}
