//! Property-based tests using proptest
//!
//! Tests that verify properties hold for arbitrary inputs.

use network_exporter::collectors::interfaces::{duplex_value, parse_speed_mbps};
use network_exporter::collectors::{node_uuid, or_placeholder, EntityIds};
use network_exporter::metrics::{render_snapshot, Metric, IFACE_DESCR, NODE_UP};
use proptest::prelude::*;

proptest! {
    #[test]
    fn test_speed_is_never_negative(speed in "\\PC*") {
        // Given: Any speed string a device might report
        // When: Normalizing it
        let mbps = parse_speed_mbps(&speed);

        // Then: The result is never negative
        prop_assert!(mbps >= 0.0);
    }

    #[test]
    fn test_speed_units_scale_values(value in 1u32..100_000) {
        // Given: A numeric speed in each unit
        let mb = parse_speed_mbps(&format!("{} Mb/s", value));
        let gb = parse_speed_mbps(&format!("{} Gb/s", value));
        let tb = parse_speed_mbps(&format!("{} Tb/s", value));

        // Then: Units scale by powers of one thousand
        prop_assert_eq!(mb, value as f64);
        prop_assert_eq!(gb, value as f64 * 1_000.0);
        prop_assert_eq!(tb, value as f64 * 1_000_000.0);
    }

    #[test]
    fn test_duplex_is_bounded(duplex in "\\PC*") {
        let encoded = duplex_value(&duplex);
        prop_assert!((0.0..=3.0).contains(&encoded));
    }

    #[test]
    fn test_any_description_renders_without_panic(descr in "\\PC*") {
        // Given: An interface description with arbitrary characters
        let metrics = vec![
            Metric::new(&NODE_UP, 1.0, vec!["n".to_string()]),
            Metric::new(
                &IFACE_DESCR,
                1.0,
                vec!["n".to_string(), "i".to_string(), or_placeholder(&descr)],
            ),
        ];

        // When: Rendering
        let result = render_snapshot(metrics);

        // Then: Rendering succeeds
        prop_assert!(result.is_ok());
    }

    #[test]
    fn test_placeholder_never_empty(value in "\\PC*") {
        prop_assert!(!or_placeholder(&value).is_empty());
    }

    #[test]
    fn test_node_uuid_is_deterministic(name in "\\PC*") {
        // Given: Any node name
        // When: Deriving its uuid twice
        // Then: Both are identical
        prop_assert_eq!(node_uuid(&name), node_uuid(&name));
    }

    #[test]
    fn test_entity_ids_are_deterministic_per_node(node in "[a-z0-9-]{1,16}", iface in "[A-Za-z0-9/]{1,16}") {
        // Given: Two independent caches for the same node
        let first = EntityIds::new(node_uuid(&node));
        let second = EntityIds::new(node_uuid(&node));

        // Then: They derive the same 32-character interface id
        prop_assert_eq!(first.interface(&iface), second.interface(&iface));
        prop_assert_eq!(first.interface(&iface).len(), 32);
    }
}
