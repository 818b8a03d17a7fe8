//! Built-in dialects and drivers
//!
//! Each built-in dialect is a capability profile under a stable type name.
//! SQL Server and MySQL additionally declare an associated driver.

use std::sync::Arc;

use dialect_profile::{CapabilityProfile, Dialect, Driver};

use crate::loader::{DialectType, DriverType};

/// Embedded product-name to dialect-name table loaded at bootstrap
pub const BUILTIN_DATABASE_IDS: &str = include_str!("../resources/database-id.properties");

macro_rules! profile_dialects {
    ($($ty:ident => $profile:expr;)*) => {
        $(
            #[derive(Debug, Clone)]
            pub struct $ty {
                profile: CapabilityProfile,
            }

            impl $ty {
                pub fn new() -> Self {
                    Self { profile: $profile }
                }
            }

            impl Default for $ty {
                fn default() -> Self {
                    Self::new()
                }
            }

            impl Dialect for $ty {
                fn profile(&self) -> &CapabilityProfile {
                    &self.profile
                }
            }
        )*

        fn profile_dialect_types() -> Vec<DialectType> {
            vec![$(
                DialectType::new(
                    concat!(module_path!(), "::", stringify!($ty)),
                    || -> Arc<dyn Dialect> { Arc::new($ty::new()) },
                ),
            )*]
        }
    };
}

/// `LIMIT ?` without an offset
fn limit_only() -> CapabilityProfile {
    CapabilityProfile::new().with_variable_limit(true)
}

/// `TOP ?` / `FIRST ?` right after `SELECT`
fn top() -> CapabilityProfile {
    limit_only().with_parameters_first(true)
}

profile_dialects! {
    Cache71Dialect => top();
    CUBRIDDialect => CapabilityProfile::new()
        .with_variable_limit(true)
        .with_limit_offset(true)
        .with_max_for_limit(true);
    DB2Dialect => CapabilityProfile::new().with_limit_offset(true);
    DerbyDialect => CapabilityProfile::new().with_limit_offset(true);
    FirebirdDialect => CapabilityProfile::limit_offset().with_parameters_first(true);
    FrontBaseDialect => CapabilityProfile::new();
    H2Dialect => CapabilityProfile::limit_offset();
    HSQLDialect => CapabilityProfile::new()
        .with_variable_limit(true)
        .with_limit_offset(true);
    InformixDialect => CapabilityProfile::new();
    IngresDialect => CapabilityProfile::new().with_limit_offset(true);
    InterbaseDialect => CapabilityProfile::new()
        .with_variable_limit(true)
        .with_limit_offset(true)
        .with_max_for_limit(true);
    JDataStoreDialect => CapabilityProfile::new();
    MckoiDialect => limit_only();
    MimerSQLDialect => CapabilityProfile::new();
    MariaDBDialect => CapabilityProfile::new()
        .with_variable_limit(true)
        .with_limit_offset(true);
    OracleDialect => CapabilityProfile::limit_offset().with_max_for_limit(true);
    PointbaseDialect => CapabilityProfile::new();
    PostgreSQLDialect => CapabilityProfile::limit_offset();
    ProgressDialect => CapabilityProfile::new();
    RDMSOS2200Dialect => CapabilityProfile::new();
    SAPDBDialect => CapabilityProfile::new();
    SQLiteDialect => CapabilityProfile::limit_offset();
    SybaseDialect => CapabilityProfile::new();
    TeradataDialect => CapabilityProfile::new();
    TimesTenDialect => CapabilityProfile::new().with_limit_offset(true);
}

/// `LIMIT ?, ?` with the driver recorded when one is available
#[derive(Debug, Clone)]
pub struct MySQLDialect {
    profile: CapabilityProfile,
    driver: Option<Arc<dyn Driver>>,
}

impl MySQLDialect {
    pub const DRIVER: &'static str = "mysql::MySqlDriver";

    pub fn new() -> Self {
        Self {
            profile: CapabilityProfile::new()
                .with_variable_limit(true)
                .with_limit_offset(true),
            driver: None,
        }
    }

    pub fn with_driver(driver: Arc<dyn Driver>) -> Self {
        Self {
            driver: Some(driver),
            ..Self::new()
        }
    }
}

impl Default for MySQLDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for MySQLDialect {
    fn profile(&self) -> &CapabilityProfile {
        &self.profile
    }

    fn driver(&self) -> Option<&Arc<dyn Driver>> {
        self.driver.as_ref()
    }
}

/// SQL Server: `TOP` before 2012, `OFFSET ? ROWS FETCH NEXT ? ROWS ONLY` after
#[derive(Debug, Clone)]
pub struct SQLServerDialect {
    profile: CapabilityProfile,
    driver: Option<Arc<dyn Driver>>,
}

impl SQLServerDialect {
    pub const NAME: &'static str = "sqlserver";

    /// First driver generation shipping with SQL Server 2012 support
    pub const OFFSET_FETCH_DRIVER_VERSION: u32 = 11;

    pub fn new() -> Self {
        Self {
            profile: Self::top_profile(),
            driver: None,
        }
    }

    pub fn with_driver(driver: Arc<dyn Driver>) -> Self {
        let profile = if driver.major_version() >= Self::OFFSET_FETCH_DRIVER_VERSION {
            Self::offset_fetch_profile()
        } else {
            Self::top_profile()
        };
        Self {
            profile,
            driver: Some(driver),
        }
    }

    fn top_profile() -> CapabilityProfile {
        CapabilityProfile::new()
    }

    fn offset_fetch_profile() -> CapabilityProfile {
        CapabilityProfile::new()
            .with_variable_limit(true)
            .with_limit_offset(true)
            .with_forced_limit(true)
    }
}

impl Default for SQLServerDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl Dialect for SQLServerDialect {
    fn profile(&self) -> &CapabilityProfile {
        &self.profile
    }

    fn driver(&self) -> Option<&Arc<dyn Driver>> {
        self.driver.as_ref()
    }
}

/// Version-carrying driver description
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VersionedDriver {
    type_name: &'static str,
    major: u32,
    minor: u32,
}

impl VersionedDriver {
    pub const fn new(type_name: &'static str, major: u32, minor: u32) -> Self {
        Self {
            type_name,
            major,
            minor,
        }
    }
}

impl Driver for VersionedDriver {
    fn type_name(&self) -> &str {
        self.type_name
    }

    fn major_version(&self) -> u32 {
        self.major
    }

    fn minor_version(&self) -> u32 {
        self.minor
    }
}

/// Driver the built-in SQL Server dialect declares
pub const TDS_DRIVER: &str = "tiberius::TdsDriver";

/// Pre-11 SQL Server driver. No built-in dialect declares it; it is in the
/// built-in catalog so a SQL Server dialect type wired with
/// `.with_driver(JTDS_DRIVER)` loads and gets the TOP profile.
pub const JTDS_DRIVER: &str = "jtds::JtdsDriver";

/// Every built-in dialect type
pub fn dialect_types() -> Vec<DialectType> {
    let mut types = profile_dialect_types();
    types.push(
        DialectType::new(
            concat!(module_path!(), "::MySQLDialect"),
            || -> Arc<dyn Dialect> { Arc::new(MySQLDialect::new()) },
        )
        .with_driver(MySQLDialect::DRIVER)
        .with_driver_constructor(|driver| -> Arc<dyn Dialect> {
            Arc::new(MySQLDialect::with_driver(driver))
        }),
    );
    types.push(
        DialectType::new(
            concat!(module_path!(), "::SQLServerDialect"),
            || -> Arc<dyn Dialect> { Arc::new(SQLServerDialect::new()) },
        )
        .with_declared_name(SQLServerDialect::NAME)
        .with_driver(TDS_DRIVER)
        .with_driver_constructor(|driver| -> Arc<dyn Dialect> {
            Arc::new(SQLServerDialect::with_driver(driver))
        }),
    );
    types
}

/// Every built-in driver type
pub fn driver_types() -> Vec<DriverType> {
    vec![
        DriverType::new(TDS_DRIVER, || -> Arc<dyn Driver> {
            Arc::new(VersionedDriver::new(TDS_DRIVER, 12, 4))
        }),
        DriverType::new(JTDS_DRIVER, || -> Arc<dyn Driver> {
            Arc::new(VersionedDriver::new(JTDS_DRIVER, 1, 3))
        }),
    ]
}

/// Type names registered at bootstrap
pub fn dialect_type_names() -> Vec<String> {
    dialect_types()
        .iter()
        .map(|t| t.type_name().to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_catalog_has_every_dialect() {
        let names = dialect_type_names();
        assert_eq!(names.len(), 27);
        assert!(names.contains(&"dialect_registry::builtin::PostgreSQLDialect".to_string()));
        assert!(names.contains(&"dialect_registry::builtin::SQLServerDialect".to_string()));
    }

    #[test]
    fn test_sqlserver_profile_follows_driver_version() {
        let modern = SQLServerDialect::with_driver(Arc::new(VersionedDriver::new(TDS_DRIVER, 12, 4)));
        assert!(modern.profile().supports_limit_offset());
        assert!(modern.profile().force_limit_usage());

        let legacy = SQLServerDialect::with_driver(Arc::new(VersionedDriver::new(JTDS_DRIVER, 1, 3)));
        assert!(!legacy.profile().supports_variable_limit());
        assert_eq!(legacy.driver().map(|d| d.type_name()), Some(JTDS_DRIVER));
    }

    #[test]
    fn test_builtin_database_ids_resource_is_not_empty() {
        assert!(BUILTIN_DATABASE_IDS.lines().any(|l| l.starts_with("PostgreSQL")));
    }
}
