//! Well-known TCP service names.
//!
//! Used by the default application resolver to name what usually listens
//! on an open port. Covers the well-known range plus a few common
//! alternates for scans run with a wider port range.

/// Sorted by port for binary search.
static TCP_SERVICES: &[(u16, &str)] = &[
    (7, "echo"),
    (9, "discard"),
    (13, "daytime"),
    (20, "ftp-data"),
    (21, "ftp"),
    (22, "ssh"),
    (23, "telnet"),
    (25, "smtp"),
    (37, "time"),
    (43, "whois"),
    (49, "tacacs"),
    (53, "dns"),
    (70, "gopher"),
    (79, "finger"),
    (80, "http"),
    (88, "kerberos"),
    (102, "iso-tsap"),
    (106, "pop3pw"),
    (110, "pop3"),
    (111, "rpcbind"),
    (113, "ident"),
    (119, "nntp"),
    (135, "msrpc"),
    (139, "netbios-ssn"),
    (143, "imap"),
    (179, "bgp"),
    (194, "irc"),
    (389, "ldap"),
    (427, "svrloc"),
    (443, "https"),
    (445, "microsoft-ds"),
    (464, "kpasswd"),
    (465, "smtps"),
    (497, "retrospect"),
    (513, "rlogin"),
    (514, "rsh"),
    (515, "printer"),
    (543, "klogin"),
    (544, "kshell"),
    (548, "afp"),
    (554, "rtsp"),
    (587, "submission"),
    (593, "http-rpc-epmap"),
    (631, "ipp"),
    (636, "ldaps"),
    (646, "ldp"),
    (873, "rsync"),
    (902, "vmware-auth"),
    (989, "ftps-data"),
    (990, "ftps"),
    (993, "imaps"),
    (995, "pop3s"),
    (1433, "mssql"),
    (3306, "mysql"),
    (3389, "rdp"),
    (5432, "postgresql"),
    (5900, "vnc"),
    (6379, "redis"),
    (8080, "http-proxy"),
    (8443, "https-alt"),
];

/// Look up the probable service name for a given port.
///
/// Returns `None` if the port is not in the table.
pub fn get_service_name(port: u16) -> Option<&'static str> {
    TCP_SERVICES
        .binary_search_by_key(&port, |&(p, _)| p)
        .ok()
        .map(|i| TCP_SERVICES[i].1)
}

/// Get the service name for a port, or "unknown".
pub fn get_service_description(port: u16) -> &'static str {
    get_service_name(port).unwrap_or("unknown")
}
