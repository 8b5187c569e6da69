use crate::permissions::PermissionSet;

/// Static navigation descriptor. Filtered at render time, never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    pub label: String,
    pub target: String,
    pub required_permission: String,
}

impl MenuEntry {
    #[must_use]
    pub fn new(
        label: impl Into<String>,
        target: impl Into<String>,
        required_permission: impl Into<String>,
    ) -> Self {
        Self {
            label: label.into(),
            target: target.into(),
            required_permission: required_permission.into(),
        }
    }
}

/// Strict permission filter over the menu, preserving input order.
///
/// An entry is visible iff its required permission is in the effective set —
/// no role-based bypass here; that is the route guard's concern. The
/// returned iterator is lazy and re-derivable at any time from the current
/// set; it is never cached independently of it.
pub fn compose<'a>(
    entries: &'a [MenuEntry],
    permissions: &'a PermissionSet,
) -> impl Iterator<Item = &'a MenuEntry> {
    entries
        .iter()
        .filter(|entry| permissions.contains(&entry.required_permission))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn menu() -> Vec<MenuEntry> {
        vec![
            MenuEntry::new("Órdenes", "/ordenes", "ordenes.view"),
            MenuEntry::new("Clientes", "/clientes", "clientes.view"),
            MenuEntry::new("Inventario", "/inventario", "inventario.view"),
            MenuEntry::new("Usuarios", "/usuarios", "usuarios.admin"),
        ]
    }

    fn labels<'a>(it: impl Iterator<Item = &'a MenuEntry>) -> Vec<&'a str> {
        it.map(|e| e.label.as_str()).collect()
    }

    #[test]
    fn filters_by_membership_preserving_order() {
        let entries = menu();
        let set: PermissionSet = ["clientes.view", "ordenes.view"].into_iter().collect();
        assert_eq!(labels(compose(&entries, &set)), ["Órdenes", "Clientes"]);
    }

    #[test]
    fn admin_permission_shows_only_its_entry() {
        let entries = menu();
        let set: PermissionSet = ["usuarios.admin"].into_iter().collect();
        assert_eq!(labels(compose(&entries, &set)), ["Usuarios"]);
    }

    #[test]
    fn empty_set_yields_empty_menu() {
        let entries = menu();
        let set = PermissionSet::new();
        assert_eq!(compose(&entries, &set).count(), 0);
    }

    #[test]
    fn no_role_based_bypass() {
        // The composer only sees permissions; an admin with an empty set
        // gets an empty menu.
        let entries = menu();
        let set = PermissionSet::new();
        assert!(labels(compose(&entries, &set)).is_empty());
    }

    #[test]
    fn monotonic_under_set_growth() {
        let entries = menu();
        let smaller: PermissionSet = ["ordenes.view"].into_iter().collect();
        let larger: PermissionSet = ["ordenes.view", "inventario.view", "usuarios.admin"]
            .into_iter()
            .collect();

        let small_visible = labels(compose(&entries, &smaller));
        let large_visible = labels(compose(&entries, &larger));

        // compose(P1) is a subsequence of compose(P2) for P1 ⊆ P2.
        let mut remaining = large_visible.iter();
        for label in &small_visible {
            assert!(
                remaining.any(|l| l == label),
                "{label} missing or out of order in the larger composition"
            );
        }
    }

    #[test]
    fn iterator_is_restartable() {
        let entries = menu();
        let set: PermissionSet = ["ordenes.view"].into_iter().collect();
        assert_eq!(compose(&entries, &set).count(), 1);
        assert_eq!(compose(&entries, &set).count(), 1);
    }
}
