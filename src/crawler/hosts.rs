/// Checks if a reported host should never be scheduled as a mesh node
///
/// Two kinds of host entries are skipped:
/// 1. LAN clients behind a node: `lan.<anything>.local.mesh`
/// 2. Secondary interface aliases of a node: `mid<digits>.<anything>`
///
/// Matching is case-sensitive and happens before the visited-set check, which
/// compares upper-cased names.
///
/// # Examples
///
/// ```
/// use mesh_walker::crawler::is_excluded_host;
///
/// assert!(is_excluded_host("lan.node1.local.mesh"));
/// assert!(is_excluded_host("mid3.node1.local.mesh"));
/// assert!(!is_excluded_host("node1.local.mesh"));
/// ```
pub fn is_excluded_host(name: &str) -> bool {
    is_lan_client(name) || is_interface_alias(name)
}

fn is_lan_client(name: &str) -> bool {
    name.starts_with("lan.") && name.ends_with(".local.mesh")
}

fn is_interface_alias(name: &str) -> bool {
    let Some(rest) = name.strip_prefix("mid") else {
        return false;
    };
    let digits = rest.bytes().take_while(u8::is_ascii_digit).count();
    digits > 0 && rest.as_bytes().get(digits) == Some(&b'.')
}

/// Visited-set key for a host name
pub fn normalize_node(name: &str) -> String {
    name.to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lan_clients_excluded() {
        assert!(is_excluded_host("lan.node1.local.mesh"));
        assert!(is_excluded_host("lan.KI5VMF-oklahoma-supernode.local.mesh"));
    }

    #[test]
    fn test_lan_prefix_needs_mesh_suffix() {
        assert!(!is_excluded_host("lan.node1"));
        assert!(!is_excluded_host("lan.node1.local.mesh.example"));
        assert!(!is_excluded_host("node1.lan.local.mesh"));
    }

    #[test]
    fn test_interface_aliases_excluded() {
        assert!(is_excluded_host("mid3.node1.local.mesh"));
        assert!(is_excluded_host("mid1.KI5VMF"));
        assert!(is_excluded_host("mid12.node1"));
    }

    #[test]
    fn test_mid_needs_digits_then_dot() {
        assert!(!is_excluded_host("mid.node1"));
        assert!(!is_excluded_host("midnode1.local.mesh"));
        assert!(!is_excluded_host("mid3node1"));
        assert!(!is_excluded_host("mid3"));
        assert!(!is_excluded_host("xmid3.node1"));
    }

    #[test]
    fn test_plain_nodes_kept() {
        assert!(!is_excluded_host("node1.local.mesh"));
        assert!(!is_excluded_host("KF5ABC-tunnel"));
        assert!(!is_excluded_host(""));
    }

    #[test]
    fn test_matching_is_case_sensitive() {
        assert!(!is_excluded_host("LAN.node1.local.mesh"));
        assert!(!is_excluded_host("MID3.node1.local.mesh"));
        assert!(!is_excluded_host("lan.node1.LOCAL.MESH"));
    }

    #[test]
    fn test_normalize_node() {
        assert_eq!(normalize_node("ki5vmf-Oklahoma"), "KI5VMF-OKLAHOMA");
        assert_eq!(normalize_node("NODE1"), "NODE1");
    }
}
