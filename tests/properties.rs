use envbind::{Bind, Loader, Snapshot};
use proptest::prelude::*;
use std::collections::HashMap;

#[derive(Debug, Default, Clone, PartialEq, Bind)]
struct Endpoint {
    host: String,
    port: u16,
}

#[derive(Debug, Default, Clone, PartialEq, Bind)]
struct Settings {
    name: String,
    retries: i64,
    ratio: f64,
    enabled: bool,
    endpoint: Option<Box<Endpoint>>,
    hosts: Vec<String>,
    limits: HashMap<String, u32>,
}

fn arb_value() -> impl Strategy<Value = String> {
    "[a-zA-Z0-9./:-]{1,16}"
}

fn arb_key() -> impl Strategy<Value = String> {
    "[a-z][a-z0-9]{0,7}"
}

fn arb_settings() -> impl Strategy<Value = Settings> {
    (
        arb_value(),
        any::<i64>(),
        -1.0e6f64..1.0e6f64,
        any::<bool>(),
        proptest::option::of((arb_value(), any::<u16>())),
        proptest::collection::vec(arb_value(), 0..6),
        proptest::collection::hash_map(arb_key(), any::<u32>(), 0..6),
    )
        .prop_map(|(name, retries, ratio, enabled, endpoint, hosts, limits)| Settings {
            name,
            retries,
            ratio,
            enabled,
            endpoint: endpoint.map(|(host, port)| Box::new(Endpoint { host, port })),
            hosts,
            limits,
        })
}

fn to_env(settings: &Settings) -> Vec<(String, String)> {
    let mut env = vec![
        ("SVC_NAME".to_string(), settings.name.clone()),
        ("SVC_RETRIES".to_string(), settings.retries.to_string()),
        ("SVC_RATIO".to_string(), settings.ratio.to_string()),
        ("SVC_ENABLED".to_string(), settings.enabled.to_string()),
    ];

    if let Some(endpoint) = &settings.endpoint {
        env.push(("SVC_ENDPOINT_HOST".to_string(), endpoint.host.clone()));
        env.push(("SVC_ENDPOINT_PORT".to_string(), endpoint.port.to_string()));
    }

    for (index, host) in settings.hosts.iter().enumerate() {
        env.push((format!("SVC_HOSTS_{}", index), host.clone()));
    }

    for (key, limit) in &settings.limits {
        env.push((format!("SVC_LIMITS_{}", key.to_uppercase()), limit.to_string()));
    }

    env
}

proptest! {
    #[test]
    fn load_reads_back_every_value(settings in arb_settings()) {
        let snapshot = to_env(&settings).into_iter().collect::<Snapshot>();
        let mut loaded = Settings::default();

        Loader::new("svc", "_").load_from(&snapshot, &mut loaded).unwrap();

        prop_assert_eq!(loaded, settings);
    }

    #[test]
    fn sequence_order_does_not_matter(
        hosts in proptest::collection::vec(arb_value(), 1..8),
        seed in any::<u64>(),
    ) {
        let settings = Settings { hosts, ..Default::default() };
        let mut env = to_env(&settings);

        // deterministic shuffle of the listing order
        let len = env.len();
        for index in 0..len {
            let other = (seed as usize).wrapping_add(index.wrapping_mul(31)) % len;
            env.swap(index, other);
        }

        let snapshot = env.into_iter().collect::<Snapshot>();
        let mut loaded = Settings::default();

        Loader::new("svc", "_").load_from(&snapshot, &mut loaded).unwrap();

        prop_assert_eq!(loaded.hosts, settings.hosts);
    }

    #[test]
    fn load_is_idempotent(settings in arb_settings()) {
        let snapshot = to_env(&settings).into_iter().collect::<Snapshot>();
        let loader = Loader::new("svc", "_");

        let mut once = Settings::default();
        loader.load_from(&snapshot, &mut once).unwrap();

        let mut twice = Settings::default();
        loader.load_from(&snapshot, &mut twice).unwrap();
        loader.load_from(&snapshot, &mut twice).unwrap();

        prop_assert_eq!(once, twice);
    }
}
