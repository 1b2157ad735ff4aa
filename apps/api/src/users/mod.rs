// User accounts. Identities live with the identity provider; this table only
// mirrors the emails that have signed in.

pub mod handlers;
