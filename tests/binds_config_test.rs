use cadence::config::BindsConfig;
use cadence::input::{BindId, ButtonDeclaration, Input, StaticBindRegistry, keys, mouse};
use proptest::prelude::*;
use tempfile::tempdir;

fn registry_with_shared_default() -> StaticBindRegistry {
    let mut registry = StaticBindRegistry::new();
    registry.add_button(
        ButtonDeclaration::new(BindId::new("core", "jump"), "Jump")
            .with_default(Input::key(keys::SPACE)),
    );
    registry.add_button(
        ButtonDeclaration::new(BindId::new("core", "fly"), "Fly")
            .with_default(Input::key(keys::SPACE))
            .with_default(Input::key(keys::F)),
    );
    registry
}

#[test]
fn test_create_default_first_declaration_claims_shared_input() {
    let registry = registry_with_shared_default();
    let config = BindsConfig::create_default(&registry);

    assert_eq!(
        config.get_binds(&BindId::new("core", "jump")),
        &[Input::key(keys::SPACE)]
    );
    // The second declaration loses the contested default but keeps its
    // uncontested one.
    assert_eq!(
        config.get_binds(&BindId::new("core", "fly")),
        &[Input::key(keys::F)]
    );
}

#[test]
fn test_update_for_changed_mods_preserves_user_binds() {
    let registry = registry_with_shared_default();
    let mut config = BindsConfig::new();
    // User rebound jump away from its default.
    config.set_binds(BindId::new("core", "jump"), &[Input::key(keys::J)]);

    config.update_for_changed_mods(&registry);

    assert_eq!(
        config.get_binds(&BindId::new("core", "jump")),
        &[Input::key(keys::J)]
    );
    // The new bind picks up its defaults, including SPACE which the user
    // freed up.
    assert_eq!(
        config.get_binds(&BindId::new("core", "fly")),
        &[Input::key(keys::SPACE), Input::key(keys::F)]
    );
}

#[test]
fn test_update_for_changed_mods_skips_user_claimed_defaults() {
    let mut registry = StaticBindRegistry::new();
    registry.add_button(
        ButtonDeclaration::new(BindId::new("mod", "dash"), "Dash")
            .with_default(Input::key(keys::LEFT_SHIFT)),
    );
    let mut config = BindsConfig::new();
    config.set_binds(BindId::new("core", "sneak"), &[Input::key(keys::LEFT_SHIFT)]);

    config.update_for_changed_mods(&registry);

    // The default was already claimed by the user, so the new bind stays
    // empty rather than stealing it.
    assert!(!config.has_binds(&BindId::new("mod", "dash")));
    assert_eq!(
        config.get_binds(&BindId::new("core", "sneak")),
        &[Input::key(keys::LEFT_SHIFT)]
    );
}

#[test]
fn test_save_and_load_roundtrip() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("binds.json");

    let mut config = BindsConfig::new();
    config.set_binds(
        BindId::new("core", "jump"),
        &[Input::key(keys::SPACE), Input::wheel_up()],
    );
    config.set_binds(
        BindId::new("core", "attack"),
        &[Input::mouse_button(mouse::LEFT)],
    );

    config.save_to(&path).unwrap();
    let loaded = BindsConfig::load_from(&path).unwrap();
    assert_eq!(loaded, config);
}

#[test]
fn test_load_missing_file_is_empty_config() {
    let dir = tempdir().unwrap();
    let loaded = BindsConfig::load_from(dir.path().join("absent.json")).unwrap();
    assert_eq!(loaded, BindsConfig::new());
}

#[test]
fn test_saved_file_groups_by_module_in_order() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("binds.json");

    let mut config = BindsConfig::new();
    config.set_binds(BindId::new("zeta", "thing"), &[Input::key(keys::Z)]);
    config.set_binds(BindId::new("alpha", "thing"), &[Input::key(keys::A)]);
    config.set_binds(BindId::new("core", "thing"), &[Input::key(keys::C)]);
    config.save_to(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    let alpha = content.find("\"alpha\"").unwrap();
    let core = content.find("\"core\"").unwrap();
    let zeta = content.find("\"zeta\"").unwrap();
    assert!(alpha < core && core < zeta);
}

fn arb_input() -> impl Strategy<Value = Input> {
    prop_oneof![
        (1..40i32).prop_map(Input::key),
        (0..3i32).prop_map(Input::mouse_button),
        Just(Input::wheel_up()),
        Just(Input::wheel_down()),
    ]
}

fn arb_bind_id() -> impl Strategy<Value = BindId> {
    ("[a-c]{1,3}", "[a-d]{1,3}").prop_map(|(module, name)| BindId::new(module, name))
}

proptest! {
    // Any sequence of assignments leaves each input held by at most one
    // bind.
    #[test]
    fn prop_no_input_bound_twice(
        ops in prop::collection::vec((arb_bind_id(), prop::collection::vec(arb_input(), 0..4)), 1..20)
    ) {
        let mut config = BindsConfig::new();
        for (id, inputs) in &ops {
            config.set_binds(id.clone(), inputs);
        }
        let mut seen = std::collections::HashSet::new();
        for id in config.bound_ids() {
            for input in config.get_binds(id) {
                prop_assert!(seen.insert(*input), "{} bound twice", input);
            }
        }
    }

    // The last assignment of an input always wins.
    #[test]
    fn prop_latest_assignment_wins(
        ops in prop::collection::vec((arb_bind_id(), prop::collection::vec(arb_input(), 1..4)), 1..20)
    ) {
        let mut config = BindsConfig::new();
        for (id, inputs) in &ops {
            config.set_binds(id.clone(), inputs);
        }
        let (last_id, last_inputs) = ops.last().unwrap();
        for input in last_inputs {
            prop_assert!(config.get_binds(last_id).contains(input));
        }
    }
}
