//! The facet categories harvested per run.
//!
//! This is static configuration, not scheduler logic: the orchestrator takes
//! the list as a parameter, so callers can restrict a run to a subset.

/// Every facet category Shodan's search interface exposes, in the order the
/// run processes them. Each entry becomes one task and one output artifact.
pub const FACETS: &[&str] = &[
    "asn",
    "bitcoin.ip",
    "bitcoin.ip_count",
    "bitcoin.port",
    "bitcoin.user_agent",
    "bitcoin.version",
    "city",
    "cloud.provider",
    "cloud.region",
    "cloud.service",
    "country",
    "cpe",
    "device",
    "domain",
    "has_screenshot",
    "hash",
    "http.component",
    "http.component_category",
    "http.favicon.hash",
    "http.headers_hash",
    "http.html_hash",
    "http.robots_hash",
    "http.status",
    "http.title",
    "http.waf",
    "ip",
    "isp",
    "link",
    "mongodb.database.name",
    "ntp.ip",
    "ntp.ip_count",
    "ntp.more",
    "ntp.port",
    "org",
    "os",
    "port",
    "postal",
    "product",
    "redis.key",
    "region",
    "rsync.module",
    "screenshot.hash",
    "screenshot.label",
    "snmp.contact",
    "snmp.location",
    "snmp.name",
    "ssh.cipher",
    "ssh.fingerprint",
    "ssh.hassh",
    "ssh.mac",
    "ssh.type",
    "ssl.alpn",
    "ssl.cert.alg",
    "ssl.cert.expired",
    "ssl.cert.extension",
    "ssl.cert.fingerprint",
    "ssl.cert.issuer.cn",
    "ssl.cert.pubkey.bits",
    "ssl.cert.pubkey.type",
    "ssl.cert.serial",
    "ssl.cert.subject.cn",
    "ssl.chain_count",
    "ssl.cipher.bits",
    "ssl.cipher.name",
    "ssl.cipher.version",
    "ssl.ja3s",
    "ssl.jarm",
    "ssl.version",
    "state",
    "tag",
    "telnet.do",
    "telnet.dont",
    "telnet.option",
    "telnet.will",
    "telnet.wont",
    "uptime",
    "version",
    "vuln",
    "vuln.verified",
];

/// Whether a name is one of the known facet categories.
pub fn is_known(facet: &str) -> bool {
    FACETS.contains(&facet)
}
