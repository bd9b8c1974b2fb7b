pub mod cleanup;
pub mod lookup;
pub mod referral;
pub mod servers;
pub mod whois;

pub use cleanup::{is_not_found, strip_disclaimer};
pub use lookup::{Lookup, WhoisLookup};
pub use referral::extract_referral;
pub use servers::{WhoisServer, select_server};
pub use whois::query_whois;
