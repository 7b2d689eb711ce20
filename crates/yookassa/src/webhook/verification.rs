//! Source-IP verification for inbound notifications.
//!
//! YooKassa publishes a fixed set of networks its notifications come from
//! (<https://yookassa.ru/developers/using-api/webhooks#ip>). A receiver should
//! check the peer address against them before trusting the payload:
//!
//! ```
//! use yookassa::webhook::is_notification_ip_trusted;
//!
//! assert!(is_notification_ip_trusted("185.71.76.5"));
//! assert!(!is_notification_ip_trusted("185.71.76.5:8080"));
//! ```
//!
//! Classification is fail-closed: anything that does not parse as a bare IPv4
//! or IPv6 literal is untrusted.

use std::net::IpAddr;
use std::sync::LazyLock;

use ipnet::IpNet;

/// Networks YooKassa sends notifications from.
pub const YOOKASSA_CIDRS: [&str; 7] = [
    // IPv4 ranges
    "185.71.76.0/27",
    "185.71.77.0/27",
    "77.75.153.0/25",
    "77.75.154.128/25",
    // Single hosts
    "77.75.156.11/32",
    "77.75.156.35/32",
    // IPv6 range
    "2a02:5180::/32",
];

static YOOKASSA_NETWORKS: LazyLock<TrustedNetworks> =
    LazyLock::new(|| match TrustedNetworks::from_cidrs(YOOKASSA_CIDRS) {
        Ok(networks) => networks,
        // The list is compiled in; a bad entry means the binary itself is broken.
        Err(e) => panic!("built-in YooKassa network list is corrupt: {e}"),
    });

#[derive(Debug, thiserror::Error)]
#[error("invalid CIDR {cidr:?}: {source}")]
pub struct InvalidCidr {
    pub cidr: String,
    #[source]
    pub source: ipnet::AddrParseError,
}

/// An immutable, ordered set of trusted networks.
///
/// Built once and never mutated, so a shared reference can be queried from
/// any number of threads without locking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedNetworks {
    literals: Vec<String>,
    networks: Vec<IpNet>,
}

impl TrustedNetworks {
    /// The published YooKassa networks, parsed on first use.
    ///
    /// # Panics
    /// If an entry of [`YOOKASSA_CIDRS`] does not parse.
    pub fn yookassa() -> &'static TrustedNetworks {
        &YOOKASSA_NETWORKS
    }

    /// Parse a custom set of CIDR literals, in order. Fails on the first bad entry.
    pub fn from_cidrs<I, S>(cidrs: I) -> Result<Self, InvalidCidr>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut literals = Vec::new();
        let mut networks = Vec::new();

        for cidr in cidrs {
            let cidr = cidr.as_ref();
            let network: IpNet = cidr.parse().map_err(|source| InvalidCidr {
                cidr: cidr.to_string(),
                source,
            })?;
            literals.push(cidr.to_string());
            networks.push(network.trunc());
        }

        Ok(Self { literals, networks })
    }

    /// Whether `ip` falls inside any registered network.
    ///
    /// IPv4-mapped IPv6 addresses (`::ffff:a.b.c.d`) are checked as IPv4.
    pub fn contains(&self, ip: IpAddr) -> bool {
        let ip = ip.to_canonical();
        self.networks.iter().any(|network| network.contains(&ip))
    }

    /// Parse `ip` as a bare address literal and check it.
    ///
    /// Ports, brackets, zone ids, whitespace or any other decoration make the
    /// input unparseable, and unparseable input is never trusted.
    pub fn is_trusted(&self, ip: &str) -> bool {
        ip.parse::<IpAddr>()
            .map(|ip| self.contains(ip))
            .unwrap_or(false)
    }

    /// Copy of the CIDR literals, in registration order.
    pub fn ranges(&self) -> Vec<String> {
        self.literals.clone()
    }

    pub fn networks(&self) -> &[IpNet] {
        &self.networks
    }

    pub fn len(&self) -> usize {
        self.networks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.networks.is_empty()
    }
}

/// Whether `ip` is one of the addresses YooKassa sends notifications from.
pub fn is_notification_ip_trusted(ip: &str) -> bool {
    TrustedNetworks::yookassa().is_trusted(ip)
}

/// Copy of the YooKassa notification networks in CIDR notation, e.g. for
/// firewall or load balancer configuration.
pub fn trusted_ip_ranges() -> Vec<String> {
    TrustedNetworks::yookassa().ranges()
}
