#![allow(clippy::unwrap_used, clippy::expect_used)]

use riskdesk_security::{Grant, Permission, Scope, ScopeSet, ScopeType};

fn scopes_for(grants: &[Grant], permission: Permission) -> ScopeSet {
    grants
        .iter()
        .filter(|g| g.grants(permission))
        .flat_map(|g| g.scopes().iter().copied())
        .collect()
}

#[test]
fn role_and_direct_grants_union_into_one_set() {
    let grants = vec![
        Grant::role(
            "location-manager",
            [Permission::LocationEdit],
            vec![Scope::location(42), Scope::location(43)],
        ),
        Grant::direct(
            Permission::LocationEdit,
            vec![Scope::account(7), Scope::location(42)],
        ),
        Grant::direct(Permission::ManageUsers, vec![Scope::account(99)]),
    ];

    let set = scopes_for(&grants, Permission::LocationEdit);

    assert_eq!(set.len(), 3);
    assert_eq!(set.account_ids().into_iter().collect::<Vec<_>>(), vec![7]);
    assert_eq!(
        set.filter_by_type(ScopeType::Location)
            .into_iter()
            .collect::<Vec<_>>(),
        vec![42, 43]
    );
}

#[test]
fn unrelated_permission_yields_empty_set() {
    let grants = vec![Grant::direct(Permission::Claims, vec![Scope::account(1)])];

    let set = scopes_for(&grants, Permission::Contracts);
    assert!(set.is_empty());
}

#[test]
fn stale_ids_pass_through() {
    let grants = vec![Grant::direct(
        Permission::Entities,
        vec![Scope::account(-1), Scope::location(0)],
    )];

    let set = scopes_for(&grants, Permission::Entities);
    assert!(set.account_ids().contains(&-1));
    assert!(set.location_ids().contains(&0));
}
