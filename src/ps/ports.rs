// ABOUTME: Formats published ports for container listings.
// ABOUTME: Sorts mappings and collapses runs of identical host/container ports into ranges.

use crate::runtime::PortMapping;
use std::cmp::Ordering;

const ANY_HOST_IP: &str = "0.0.0.0";

/// A contiguous run of container ports sharing host IP and protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortGroup {
    pub first: u16,
    pub last: u16,
}

#[derive(Debug)]
struct GroupKey<'a> {
    host_ip: &'a str,
    protocol: &'a str,
}

fn compare_ports(a: &PortMapping, b: &PortMapping) -> Ordering {
    a.container_port
        .cmp(&b.container_port)
        .then_with(|| a.host_ip.cmp(&b.host_ip))
        .then_with(|| a.host_port.cmp(&b.host_port))
        .then_with(|| a.protocol.cmp(&b.protocol))
}

/// Render port mappings as `host:port->port/proto` entries joined by `", "`.
///
/// Mappings whose host and container ports differ are listed individually.
/// The rest are grouped per host IP and protocol, and each group grows only
/// while the next sorted port is exactly one past its end. A same-key port
/// that does not extend its group is left out of the output.
pub fn format_ports(ports: &[PortMapping]) -> String {
    if ports.is_empty() {
        return String::new();
    }

    let mut sorted: Vec<&PortMapping> = ports.iter().collect();
    sorted.sort_by(|a, b| compare_ports(a, b));

    let mut display = Vec::new();
    // Insertion order is the render order.
    let mut groups: Vec<(GroupKey<'_>, PortGroup)> = Vec::new();

    for port in sorted {
        let host_ip = if port.host_ip.is_empty() {
            ANY_HOST_IP
        } else {
            port.host_ip.as_str()
        };

        if port.host_port != port.container_port {
            display.push(format!(
                "{}:{}->{}/{}",
                host_ip, port.host_port, port.container_port, port.protocol
            ));
            continue;
        }

        let existing = groups
            .iter_mut()
            .find(|(key, _)| key.host_ip == host_ip && key.protocol == port.protocol);

        match existing {
            None => groups.push((
                GroupKey {
                    host_ip,
                    protocol: &port.protocol,
                },
                PortGroup {
                    first: port.container_port,
                    last: port.container_port,
                },
            )),
            Some((_, group)) => {
                if group.last.checked_add(1) == Some(port.container_port) {
                    group.last = port.container_port;
                }
            }
        }
    }

    for (key, group) in &groups {
        display.push(format_group(key.host_ip, key.protocol, *group));
    }
    display.join(", ")
}

/// Render a group as `ip:first-last->first-last/proto`.
fn format_group(host_ip: &str, protocol: &str, group: PortGroup) -> String {
    let range = if group.first == group.last {
        group.first.to_string()
    } else {
        format!("{}-{}", group.first, group.last)
    };
    format!("{host_ip}:{range}->{range}/{protocol}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tcp(host_port: u16, container_port: u16) -> PortMapping {
        PortMapping::new("", host_port, container_port, "tcp")
    }

    #[test]
    fn empty_list_renders_nothing() {
        assert_eq!(format_ports(&[]), "");
    }

    #[test]
    fn contiguous_ports_collapse_into_a_range() {
        let ports = [tcp(80, 80), tcp(81, 81), tcp(82, 82)];
        assert_eq!(format_ports(&ports), "0.0.0.0:80-82->80-82/tcp");
    }

    #[test]
    fn differing_host_port_is_listed_individually() {
        assert_eq!(format_ports(&[tcp(9090, 80)]), "0.0.0.0:9090->80/tcp");
    }

    #[test]
    fn single_port_group_has_no_range() {
        assert_eq!(format_ports(&[tcp(443, 443)]), "0.0.0.0:443->443/tcp");
    }

    #[test]
    fn host_ip_and_protocol_split_groups() {
        let ports = [
            PortMapping::new("127.0.0.1", 53, 53, "udp"),
            tcp(53, 53),
            tcp(54, 54),
            PortMapping::new("127.0.0.1", 54, 54, "udp"),
        ];
        assert_eq!(
            format_ports(&ports),
            "0.0.0.0:53-54->53-54/tcp, 127.0.0.1:53-54->53-54/udp"
        );
    }

    #[test]
    fn individual_entries_precede_groups() {
        let ports = [tcp(8080, 8080), tcp(2222, 22)];
        assert_eq!(
            format_ports(&ports),
            "0.0.0.0:2222->22/tcp, 0.0.0.0:8080->8080/tcp"
        );
    }

    #[test]
    fn non_contiguous_port_with_open_key_is_dropped() {
        // 90 reuses the 0.0.0.0/tcp key but does not extend 80-81, so it vanishes.
        let ports = [tcp(80, 80), tcp(81, 81), tcp(90, 90)];
        assert_eq!(format_ports(&ports), "0.0.0.0:80-81->80-81/tcp");
    }

    #[test]
    fn top_port_does_not_overflow() {
        let ports = [tcp(65535, 65535), tcp(0, 0)];
        assert_eq!(format_ports(&ports), "0.0.0.0:0->0/tcp");
    }
}
