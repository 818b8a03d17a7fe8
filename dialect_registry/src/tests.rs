//! Registry tests

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use dialect_profile::{CapabilityProfile, Dialect, Driver};

    use crate::builtin::{self, SQLServerDialect, VersionedDriver, JTDS_DRIVER};
    use crate::{
        ConnectionMetadata, DatabaseMetadata, DialectRegistry, DialectType, DriverType, LoadError,
        RegistryError, ShapeError, TypeCatalog,
    };

    #[derive(Debug)]
    struct TestDialect {
        profile: CapabilityProfile,
        driver: Option<Arc<dyn Driver>>,
    }

    impl Dialect for TestDialect {
        fn profile(&self) -> &CapabilityProfile {
            &self.profile
        }

        fn driver(&self) -> Option<&Arc<dyn Driver>> {
            self.driver.as_ref()
        }
    }

    fn limit_offset() -> Arc<dyn Dialect> {
        Arc::new(TestDialect {
            profile: CapabilityProfile::limit_offset(),
            driver: None,
        })
    }

    fn top() -> Arc<dyn Dialect> {
        Arc::new(TestDialect {
            profile: CapabilityProfile::new()
                .with_variable_limit(true)
                .with_parameters_first(true),
            driver: None,
        })
    }

    fn with_driver(driver: Arc<dyn Driver>) -> Arc<dyn Dialect> {
        Arc::new(TestDialect {
            profile: CapabilityProfile::limit_offset().with_forced_limit(true),
            driver: Some(driver),
        })
    }

    fn test_catalog() -> Arc<TypeCatalog> {
        let catalog = TypeCatalog::new();
        catalog.define_dialect(DialectType::new("acme::FooDialect", limit_offset));
        catalog.define_dialect(DialectType::new("acme::v2::FooDialect", top));
        catalog.define_dialect(DialectType::new("acme::Vertica", limit_offset));
        catalog.define_dialect(DialectType::new("acme::Dialect", limit_offset));
        catalog.define_dialect(DialectType::new("acme::NamedDialect", limit_offset).with_declared_name("acme-named"));
        catalog.define_dialect(DialectType::new("acme::BlankDialect", limit_offset).with_declared_name("  "));
        catalog.define_dialect(DialectType::new("acme::NoDriverNameDialect", limit_offset).with_driver(""));
        catalog.define_dialect(
            DialectType::new("acme::DrivenDialect", limit_offset)
                .with_driver("acme::Driver")
                .with_driver_constructor(with_driver),
        );
        catalog.define_dialect(DialectType::new("acme::LostDriverDialect", limit_offset).with_driver("acme::Missing"));
        catalog.define_dialect(DialectType::driver_only("acme::StrandedDialect", "acme::Missing", with_driver));
        catalog.define_driver(DriverType::new("acme::Driver", || -> Arc<dyn Driver> {
            Arc::new(VersionedDriver::new("acme::Driver", 3, 1))
        }));
        catalog.define_opaque("acme::Widget");
        Arc::new(catalog)
    }

    fn test_registry() -> DialectRegistry {
        DialectRegistry::with_catalog(test_catalog())
    }

    // ========================================
    // Name derivation
    // ========================================

    #[test]
    fn test_type_name_with_dialect_suffix_derives_lowercase_stem() {
        let registry = test_registry();
        registry.register_by_type_name("acme::FooDialect").unwrap();
        assert!(registry.resolve_by_name("foo").is_some());
        assert!(registry.resolve_by_name("Foo").is_none());
    }

    #[test]
    fn test_suffix_match_ignores_case() {
        let dialect_type = DialectType::new("acme::BarDIALECT", limit_offset);
        assert_eq!(DialectRegistry::canonical_name(&dialect_type).unwrap(), "bar");
    }

    #[test]
    fn test_type_name_without_suffix_is_lowercased() {
        let registry = test_registry();
        registry.register_by_type_name("acme::Vertica").unwrap();
        assert!(registry.resolve_by_name("vertica").is_some());
    }

    #[test]
    fn test_declared_name_is_used_verbatim() {
        let registry = test_registry();
        registry.register_by_type_name("acme::NamedDialect").unwrap();
        assert!(registry.resolve_by_name("acme-named").is_some());
        assert!(registry.resolve_by_name("named").is_none());
    }

    #[test]
    fn test_bare_dialect_type_name_is_a_shape_error() {
        let registry = test_registry();
        assert!(matches!(
            registry.register_by_type_name("acme::Dialect"),
            Err(RegistryError::Shape(ShapeError::EmptyDerivedName { .. }))
        ));
    }

    #[test]
    fn test_blank_declared_name_is_a_shape_error() {
        let registry = test_registry();
        assert!(matches!(
            registry.register_by_type_name("acme::BlankDialect"),
            Err(RegistryError::Shape(ShapeError::EmptyDeclaredName { .. }))
        ));
        assert!(registry.is_empty());
    }

    // ========================================
    // Loading
    // ========================================

    #[test]
    fn test_unknown_type_is_a_load_error() {
        let registry = test_registry();
        assert_eq!(
            registry.register_by_type_name("acme::Nope").unwrap_err(),
            RegistryError::Load(LoadError::NotFound {
                type_name: "acme::Nope".to_string()
            })
        );
    }

    #[test]
    fn test_type_without_dialect_contract_is_a_load_error() {
        let registry = test_registry();
        assert!(matches!(
            registry.register_by_type_name("acme::Widget"),
            Err(RegistryError::Load(LoadError::ContractMismatch { .. }))
        ));
        assert!(matches!(
            registry.register_by_type_name("acme::Driver"),
            Err(RegistryError::Load(LoadError::ContractMismatch { .. }))
        ));
    }

    #[test]
    fn test_fallback_catalog_types_can_be_registered() {
        let registry = DialectRegistry::with_catalog(Arc::new(TypeCatalog::new()));
        assert!(registry.register_by_type_name("acme::FooDialect").is_err());

        registry.set_fallback_catalog(Some(test_catalog()));
        registry.register_by_type_name("acme::FooDialect").unwrap();
        assert!(registry.resolve_by_name("foo").is_some());
    }

    // ========================================
    // Driver-aware construction
    // ========================================

    #[test]
    fn test_driver_aware_constructor_receives_driver() {
        let registry = test_registry();
        let dialect = registry.register_by_type_name("acme::DrivenDialect").unwrap();

        let driver = dialect.driver().expect("driver injected");
        assert_eq!(driver.type_name(), "acme::Driver");
        assert_eq!(driver.major_version(), 3);
        assert!(dialect.profile().force_limit_usage());
    }

    #[test]
    fn test_missing_driver_falls_back_to_no_arg_constructor() {
        let registry = test_registry();
        let dialect = registry.register_by_type_name("acme::LostDriverDialect").unwrap();
        assert!(dialect.driver().is_none());
        assert!(registry.resolve_by_name("lostdriver").is_some());
    }

    #[test]
    fn test_blank_driver_name_is_a_shape_error() {
        let registry = test_registry();
        assert!(matches!(
            registry.register_by_type_name("acme::NoDriverNameDialect"),
            Err(RegistryError::Shape(ShapeError::EmptyDriverName { .. }))
        ));
    }

    #[test]
    fn test_no_usable_constructor_is_a_shape_error() {
        let registry = test_registry();
        assert!(matches!(
            registry.register_by_type_name("acme::StrandedDialect"),
            Err(RegistryError::Shape(ShapeError::NoConstructor { .. }))
        ));
    }

    // ========================================
    // Resolution
    // ========================================

    #[test]
    fn test_resolve_by_name_returns_registered_instance() {
        let registry = test_registry();
        let registered = registry.register_by_type_name("acme::FooDialect").unwrap();
        let resolved = registry.resolve_by_name("foo").unwrap();
        assert!(Arc::ptr_eq(&registered, &resolved));
    }

    #[test]
    fn test_resolve_by_type_name_matches_resolve_by_name() {
        let registry = test_registry();
        for type_name in ["acme::FooDialect", "acme::NamedDialect", "acme::DrivenDialect"] {
            registry.register_by_type_name(type_name).unwrap();
        }
        for (type_name, name) in [
            ("acme::FooDialect", "foo"),
            ("acme::NamedDialect", "acme-named"),
            ("acme::DrivenDialect", "driven"),
        ] {
            let by_type = registry.resolve_by_implementing_type_name(type_name).unwrap();
            let by_name = registry.resolve_by_name(name).unwrap();
            assert!(Arc::ptr_eq(&by_type, &by_name));
        }
        assert!(registry.resolve_by_implementing_type_name("acme::Nope").is_none());
    }

    #[test]
    fn test_supplied_name_is_an_additional_alias() {
        let registry = test_registry();
        let dialect = registry.register(Some("foo-alias"), "acme::FooDialect").unwrap();

        assert!(Arc::ptr_eq(&dialect, &registry.resolve_by_name("foo").unwrap()));
        assert!(Arc::ptr_eq(&dialect, &registry.resolve_by_name("foo-alias").unwrap()));
        assert_eq!(
            registry.database_ids().identify("foo-alias"),
            Some("foo-alias".to_string())
        );
    }

    #[test]
    fn test_blank_supplied_name_is_rejected_before_loading() {
        let registry = test_registry();
        assert_eq!(
            registry.register(Some(""), "acme::FooDialect").unwrap_err(),
            RegistryError::Shape(ShapeError::EmptySuppliedName)
        );
        assert!(registry.resolve_by_name("foo").is_none());
    }

    #[test]
    fn test_reregistration_replaces_previous_dialect() {
        let registry = test_registry();
        let first = registry.register_by_type_name("acme::FooDialect").unwrap();
        let second = registry.register_by_type_name("acme::v2::FooDialect").unwrap();

        let resolved = registry.resolve_by_name("foo").unwrap();
        assert!(!Arc::ptr_eq(&first, &resolved));
        assert!(Arc::ptr_eq(&second, &resolved));
        assert!(resolved.profile().bind_limit_parameters_first());

        // both type names now point at the single live "foo"
        let old_type = registry.resolve_by_implementing_type_name("acme::FooDialect").unwrap();
        assert!(Arc::ptr_eq(&old_type, &second));
    }

    #[test]
    fn test_register_profile() {
        let registry = test_registry();
        let profile = CapabilityProfile::limit_offset().with_max_for_limit(true);
        registry.register_profile("custom", profile).unwrap();

        assert_eq!(registry.resolve_by_name("custom").unwrap().profile(), &profile);
        assert!(registry.register_profile(" ", profile).is_err());
    }

    #[test]
    fn test_canonical_name_becomes_database_id() {
        let registry = test_registry();
        registry.register_by_type_name("acme::FooDialect").unwrap();
        assert_eq!(registry.database_ids().identify("foo"), Some("foo".to_string()));
    }

    // ========================================
    // Connection metadata
    // ========================================

    #[test]
    fn test_resolve_by_connection_metadata_is_memoized() {
        let registry = test_registry();
        registry.register_by_type_name("acme::FooDialect").unwrap();
        registry.database_ids().set_override("Foo Server", "foo");

        let metadata = ConnectionMetadata::new("Foo Server").into_shared();
        let first = registry.resolve_by_connection_metadata(&metadata).unwrap();

        // changing the keyword table no longer affects this connection
        registry.database_ids().set_override("Foo Server", "missing");
        let second = registry.resolve_by_connection_metadata(&metadata).unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        let other = ConnectionMetadata::new("Foo Server").into_shared();
        assert!(registry.resolve_by_connection_metadata(&other).is_none());
    }

    #[test]
    fn test_metadata_resolution_sees_reregistered_dialect() {
        let registry = test_registry();
        registry.register_by_type_name("acme::FooDialect").unwrap();
        let metadata: Arc<dyn DatabaseMetadata> = Arc::new(ConnectionMetadata::new("foo"));
        let before = registry.resolve_by_connection_metadata(&metadata).unwrap();

        let replacement = registry.register_by_type_name("acme::v2::FooDialect").unwrap();
        let after = registry.resolve_by_connection_metadata(&metadata).unwrap();

        assert!(!Arc::ptr_eq(&before, &after));
        assert!(Arc::ptr_eq(&replacement, &after));
    }

    #[test]
    fn test_unknown_connection_resolves_to_none() {
        let registry = test_registry();
        let metadata = ConnectionMetadata::new("Nobody DB").into_shared();
        assert!(registry.resolve_by_connection_metadata(&metadata).is_none());
    }

    // ========================================
    // Bootstrap
    // ========================================

    #[test]
    fn test_bootstrap_skips_broken_types() {
        let registry = test_registry();
        let registered = registry.bootstrap(&[
            "acme::FooDialect",
            "acme::StrandedDialect",
            "acme::Missing",
            "acme::LostDriverDialect",
            "acme::Widget",
            "acme::NamedDialect",
        ]);

        assert_eq!(registered, 3);
        assert_eq!(registry.registered_names(), vec!["acme-named", "foo", "lostdriver"]);
    }

    #[test]
    fn test_repeated_bootstrap_keeps_database_id_overrides() {
        let registry = DialectRegistry::with_builtins();
        registry.database_ids().set_override("MySQL", "mariadb");

        registry.bootstrap::<&str>(&[]);
        registry.bootstrap(&["acme::FooDialect"]);

        assert_eq!(
            registry.database_ids().identify("MySQL"),
            Some("mariadb".to_string())
        );
        let metadata = ConnectionMetadata::new("MySQL").into_shared();
        let resolved = registry.resolve_by_connection_metadata(&metadata).unwrap();
        assert!(Arc::ptr_eq(&resolved, &registry.resolve_by_name("mariadb").unwrap()));
    }

    #[test]
    fn test_builtin_bootstrap_registers_every_dialect() {
        let registry = DialectRegistry::with_builtins();
        assert_eq!(registry.len(), 27);
        for name in [
            "cache71", "cubrid", "db2", "derby", "firebird", "frontbase", "h2", "hsql",
            "informix", "ingres", "interbase", "jdatastore", "mckoi", "mimersql", "mysql",
            "mariadb", "oracle", "pointbase", "postgresql", "progress", "rdmsos2200", "sapdb",
            "sqlserver", "sqlite", "sybase", "teradata", "timesten",
        ] {
            assert!(registry.resolve_by_name(name).is_some(), "missing {}", name);
        }
    }

    #[test]
    fn test_builtin_sqlserver_uses_driver_profile() {
        let registry = DialectRegistry::with_builtins();
        let sqlserver = registry
            .resolve_by_implementing_type_name("dialect_registry::builtin::SQLServerDialect")
            .unwrap();
        assert!(sqlserver.driver().is_some());
        assert!(sqlserver.profile().supports_limit_offset());
        assert!(sqlserver.profile().force_limit_usage());

        let mysql = registry.resolve_by_name("mysql").unwrap();
        assert!(mysql.driver().is_none());
    }

    #[test]
    fn test_legacy_driver_downgrades_sqlserver() {
        let catalog = TypeCatalog::builtin();
        catalog.define_dialect(
            DialectType::new("legacy::SQLServerDialect", || -> Arc<dyn Dialect> {
                Arc::new(SQLServerDialect::new())
            })
            .with_driver(JTDS_DRIVER)
            .with_driver_constructor(|driver| -> Arc<dyn Dialect> {
                Arc::new(SQLServerDialect::with_driver(driver))
            }),
        );
        let registry = DialectRegistry::with_catalog(Arc::new(catalog));
        let dialect = registry.register_by_type_name("legacy::SQLServerDialect").unwrap();
        assert!(!dialect.profile().supports_variable_limit());
        assert_eq!(dialect.driver().map(|d| d.major_version()), Some(1));
    }

    #[test]
    fn test_builtin_connections_resolve_by_product_name() {
        let registry = DialectRegistry::with_builtins();
        for (product, name) in [
            ("PostgreSQL", "postgresql"),
            ("MySQL", "mysql"),
            ("Microsoft SQL Server", "sqlserver"),
            ("Oracle", "oracle"),
        ] {
            let metadata = ConnectionMetadata::new(product).into_shared();
            let resolved = registry.resolve_by_connection_metadata(&metadata).unwrap();
            assert!(Arc::ptr_eq(&resolved, &registry.resolve_by_name(name).unwrap()));
        }
    }

    #[test]
    fn test_global_registry_is_shared() {
        let first = DialectRegistry::global();
        let second = DialectRegistry::global();
        assert!(std::ptr::eq(first, second));
        assert!(first.resolve_by_name("h2").is_some());
        assert_eq!(builtin::dialect_type_names().len(), 27);
    }

    // ========================================
    // Concurrency
    // ========================================

    #[test]
    fn test_concurrent_reads_and_registrations() {
        let registry = Arc::new(test_registry());
        registry.register_by_type_name("acme::FooDialect").unwrap();

        let readers: Vec<_> = (0..8)
            .map(|_| {
                let registry = Arc::clone(&registry);
                thread::spawn(move || {
                    let metadata = ConnectionMetadata::new("foo").into_shared();
                    for _ in 0..200 {
                        assert!(registry.resolve_by_name("foo").is_some());
                        assert!(registry.resolve_by_connection_metadata(&metadata).is_some());
                    }
                })
            })
            .collect();
        let writer = {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                for i in 0..50 {
                    let type_name = if i % 2 == 0 { "acme::v2::FooDialect" } else { "acme::FooDialect" };
                    registry.register_by_type_name(type_name).unwrap();
                }
            })
        };

        for reader in readers {
            reader.join().unwrap();
        }
        writer.join().unwrap();
        assert!(registry.resolve_by_name("foo").is_some());
    }
}
