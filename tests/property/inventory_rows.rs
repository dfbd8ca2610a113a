// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Inventory Row Mapping

use proptest::prelude::*;
use serde_json::{json, Value};
use std::collections::BTreeMap;

use orion_infrastructure::client::Row;
use orion_infrastructure::inventory::{Inventory, InventoryConfig};

fn config(prefix: &str) -> InventoryConfig {
    InventoryConfig::from_yaml(&format!(
        "orion_hostname: orion\norion_username: u\norion_password: p\n\
         hostname_field: Caption\nhostvar_prefix: {}\nhostvar_fields: [IP_Address, Vendor]\n",
        prefix
    ))
    .unwrap()
}

fn host_rows() -> impl Strategy<Value = BTreeMap<String, (String, String)>> {
    prop::collection::btree_map(
        "[a-z][a-z0-9-]{0,12}",
        ("[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}\\.[0-9]{1,3}", "[A-Za-z]{0,8}"),
        0..8,
    )
}

fn to_rows(hosts: &BTreeMap<String, (String, String)>) -> Vec<Row> {
    hosts
        .iter()
        .enumerate()
        .map(|(id, (caption, (address, vendor)))| {
            let value = json!({"NodeID": id, "Caption": caption, "IP_Address": address, "Vendor": vendor});
            match value {
                Value::Object(row) => row,
                _ => unreachable!(),
            }
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_one_host_per_row(hosts in host_rows(), prefix in "[a-z]{1,6}_") {
        let config = config(&prefix);
        let mapped = config.hosts_from_rows(&to_rows(&hosts)).unwrap();

        prop_assert_eq!(mapped.len(), hosts.len());
        for (caption, (address, vendor)) in &hosts {
            let vars = &mapped[caption];
            prop_assert_eq!(vars.len(), 2);
            prop_assert_eq!(&vars["IP_Address"], &json!(address));
            prop_assert_eq!(&vars["Vendor"], &json!(vendor));

            let mut inventory = Inventory::new();
            inventory.add_host(caption, vars, &prefix);
            let prefixed = inventory.host_vars(caption).unwrap();
            prop_assert_eq!(&prefixed[&format!("{}IP_Address", prefix)], &json!(address));
        }
    }

    #[test]
    fn prop_missing_column_is_an_error(hosts in host_rows().prop_filter("non-empty", |h| !h.is_empty())) {
        let mut rows = to_rows(&hosts);
        rows[0].remove("Vendor");
        prop_assert!(config("orion_").hosts_from_rows(&rows).is_err());
    }
}
