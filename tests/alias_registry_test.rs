//! Alias resolution and implementation lookup, as seen from outside the crate.

use rstest::rstest;

use toolsuite::commands::builtin_registry;
use toolsuite::context::RunContext;
use toolsuite::{resolve_alias, Registry, Subcommand, SuiteError, SuiteResult, DEFAULT_ALIAS};

struct Noop;

impl Subcommand for Noop {
    fn run(&mut self, _ctx: &RunContext<'_>) -> SuiteResult<i32> {
        Ok(0)
    }
}

#[rstest]
fn test_version_suffix_never_changes_alias(
    #[values("playbook", "vault", "widget", "config")] name: &str,
    #[values("1", "2.9", "3.11", "10", "2024.1.0")] digits: &str,
) {
    let basename = format!("tool-{name}-{digits}");
    assert_eq!(resolve_alias(&basename).unwrap(), name);
}

#[test]
fn given_primary_name_when_resolve_then_default_alias() {
    assert_eq!(resolve_alias("tool").unwrap(), DEFAULT_ALIAS);
}

#[rstest]
#[case("widget")]
#[case("ansible")]
#[case("toolbox")]
fn test_foreign_basename_is_unknown_alias(#[case] basename: &str) {
    assert!(matches!(
        resolve_alias(basename),
        Err(SuiteError::UnknownAlias { .. })
    ));
}

#[test]
fn given_missing_alias_when_load_then_not_implemented() {
    let registry = Registry::new().with("widget", |_| Box::new(Noop));

    let err = registry.load("gadget", "tool-gadget").unwrap_err();

    match err {
        SuiteError::NotImplemented { alias, basename } => {
            assert_eq!(alias, "gadget");
            assert_eq!(basename, "tool-gadget");
        }
        other => panic!("expected NotImplemented, got {other:?}"),
    }
}

#[test]
fn given_builtin_registry_when_listed_then_has_default_and_config() {
    let registry = builtin_registry();
    assert!(registry.contains(DEFAULT_ALIAS));
    assert!(registry.contains("config"));

    let handle = registry.load("config", "tool-config").unwrap();
    assert_eq!(handle.name(), "ConfigCli");
}
