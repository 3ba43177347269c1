use serde::Serialize;

use crate::models::AuthState;
use crate::routes::RouteTable;

/// An entry in the link bar.
#[derive(Serialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum NavLink {
    Route { path: String, title: String },
    Logout,
}

/// Every configured route in table order, plus a logout action only when
/// the session is authenticated.
pub fn links(state: &AuthState, table: &RouteTable) -> Vec<NavLink> {
    let mut links: Vec<NavLink> = table
        .routes()
        .iter()
        .map(|route| NavLink::Route {
            path: route.path.clone(),
            title: route.title.clone(),
        })
        .collect();
    if state.is_authenticated() {
        links.push(NavLink::Logout);
    }
    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SessionRecord;

    #[test]
    fn logout_link_only_when_authenticated() {
        let table = RouteTable::default();
        let user = SessionRecord::new("1", "ana").expect("valid record");

        let signed_in = links(&AuthState::Authenticated(user), &table);
        assert_eq!(signed_in.last(), Some(&NavLink::Logout));
        assert_eq!(signed_in.len(), table.routes().len() + 1);

        for state in [AuthState::Unknown, AuthState::Checking, AuthState::Unauthenticated] {
            assert!(!links(&state, &table).contains(&NavLink::Logout));
        }
    }

    #[test]
    fn links_follow_table_order() {
        let table = RouteTable::default();
        let paths: Vec<_> = links(&AuthState::Unauthenticated, &table)
            .into_iter()
            .filter_map(|link| match link {
                NavLink::Route { path, .. } => Some(path),
                NavLink::Logout => None,
            })
            .collect();
        assert_eq!(
            paths,
            ["/", "/states", "/college", "/commutes", "/login", "/signup"]
        );
    }
}
