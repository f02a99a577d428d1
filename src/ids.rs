//! Human-facing record identifiers (`AUT-####` for clients, `ART-####` for
//! budgets). These are independent of the store's row ids.

use rand::Rng;

pub(crate) const CLIENT_PREFIX: &str = "AUT";
pub(crate) const BUDGET_PREFIX: &str = "ART";

const MIN: u16 = 1000;
const MAX: u16 = 9999;

/// Uniform draw over `[1000, 9999]` from the thread-local CSPRNG.
pub(crate) fn new_client_id() -> String {
    draw(CLIENT_PREFIX, &mut rand::rng())
}

pub(crate) fn new_budget_id() -> String {
    draw(BUDGET_PREFIX, &mut rand::rng())
}

pub(crate) fn draw<R: Rng + ?Sized>(prefix: &str, rng: &mut R) -> String {
    format!("{prefix}-{}", rng.random_range(MIN..=MAX))
}

/// Whether `s` has the shape of an identifier with the given prefix.
pub(crate) fn is_identifier(prefix: &str, s: &str) -> bool {
    s.len() == prefix.len() + 5
        && s.get(..prefix.len())
            .is_some_and(|p| p.eq_ignore_ascii_case(prefix))
        && s.as_bytes()[prefix.len()] == b'-'
        && s.as_bytes()[prefix.len() + 1..]
            .iter()
            .all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]

    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_client_id_shape() {
        for _ in 0..200 {
            let id = new_client_id();
            assert!(is_identifier(CLIENT_PREFIX, &id), "bad id {id}");
            let n: u16 = id[4..].parse().unwrap();
            assert!((MIN..=MAX).contains(&n));
        }
    }

    #[test]
    fn test_budget_id_shape() {
        let id = new_budget_id();
        assert!(id.starts_with("ART-"));
        assert!(is_identifier(BUDGET_PREFIX, &id));
        assert!(!is_identifier(CLIENT_PREFIX, &id));
    }

    #[test]
    fn test_draw_covers_range() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut lo = u16::MAX;
        let mut hi = 0;
        for _ in 0..20_000 {
            let n: u16 = draw("X", &mut rng)[2..].parse().unwrap();
            lo = lo.min(n);
            hi = hi.max(n);
        }
        assert!(lo < 1010, "min draw {lo}");
        assert!(hi > 9990, "max draw {hi}");
        assert!(lo >= MIN && hi <= MAX);
    }

    #[test]
    fn test_is_identifier() {
        assert!(is_identifier("AUT", "AUT-1000"));
        assert!(is_identifier("AUT", "aut-1000"));
        assert!(!is_identifier("AUT", "AUT-100"));
        assert!(!is_identifier("AUT", "AUT-10000"));
        assert!(!is_identifier("AUT", "AUT 1000"));
        assert!(!is_identifier("AUT", "AUT-10a0"));
        assert!(!is_identifier("AUT", "Maria Silva"));
        assert!(!is_identifier("AUT", "ÁUT-1000"));
    }
}
