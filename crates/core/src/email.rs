//! Canonical email normalization.
//!
//! Purchase records are keyed by email, and buyers rarely type their address
//! the same way twice. `a.b+promo@gmail.com`, `ab@gmail.com`, and
//! `A.B@googlemail.com` must all resolve to the same pending-purchase key, so
//! every email that touches the purchase pipeline goes through [`normalize`]
//! first.

/// Domains that share Gmail's alias and dot semantics.
const GMAIL_DOMAINS: [&str; 2] = ["gmail.com", "googlemail.com"];

/// Canonical domain Gmail-family addresses normalize to.
const GMAIL_CANONICAL_DOMAIN: &str = "gmail.com";

/// Normalize an email address into its canonical form.
///
/// Lowercases and trims the input, then for Gmail-family domains strips any
/// `+suffix` alias and all dots from the local part, rejoining with
/// `gmail.com`. Other domains are case-folded only.
///
/// Total and deterministic: input that does not split into exactly one
/// non-empty local part and one non-empty domain is returned
/// lowercased/trimmed as-is rather than rejected.
pub fn normalize(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();

    let Some((local, domain)) = lowered.split_once('@') else {
        return lowered;
    };
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return lowered;
    }

    if GMAIL_DOMAINS.contains(&domain) {
        let base = local.split('+').next().unwrap_or(local);
        let base = base.replace('.', "");
        format!("{base}@{GMAIL_CANONICAL_DOMAIN}")
    } else {
        lowered
    }
}
