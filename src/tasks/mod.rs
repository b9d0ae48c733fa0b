//! Built-in analysis tasks.
//!
//! Each module contributes one rule: a name, a node predicate, and a
//! factory producing the bound task. `builtin_registry` assembles them
//! in a fixed order so match order (and thus output order) stays
//! reproducible across runs.

mod empty_function;
mod low_level_call;
mod pragma_version;
mod selfdestruct;
mod spdx_license;
mod tx_origin;

use crate::task::TaskRegistry;

/// Build the registry of all built-in tasks.
pub fn builtin_registry() -> TaskRegistry {
    let mut registry = TaskRegistry::new();
    pragma_version::register(&mut registry);
    spdx_license::register(&mut registry);
    tx_origin::register(&mut registry);
    selfdestruct::register(&mut registry);
    low_level_call::register(&mut registry);
    empty_function::register(&mut registry);
    registry
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_registration_order_is_stable() {
        let registry = builtin_registry();
        let names: Vec<_> = registry.names().collect();
        assert_eq!(
            names,
            vec![
                "pragma_version",
                "spdx_license",
                "tx_origin",
                "selfdestruct",
                "low_level_call",
                "empty_function",
            ]
        );
    }
}
