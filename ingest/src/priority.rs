//! Priority tokens (`news1`, `ichi2`, `nf14`, ...) and the common-flag
//! derivation rule.

use crate::enums::PriorityType;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Priority {
    pub priority_type: PriorityType,
    pub level: u32,
}

/// Parses one `<type><level>` priority token. Returns `None` for an
/// unrecognized type or a malformed level — the caller reports that one
/// token as `IngestError::UnknownPriority` and keeps the rest.
pub fn parse_priority(token: &str) -> Option<Priority> {
    for candidate in [
        PriorityType::News,
        PriorityType::Ichi,
        PriorityType::Spec,
        PriorityType::Gai,
        PriorityType::Nf,
    ] {
        if let Some(rest) = token.strip_prefix(candidate.code()) {
            if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
                return Some(Priority {
                    priority_type: candidate,
                    level: rest.parse().ok()?,
                });
            }
        }
    }
    None
}

/// Parses a whole `ke_pri`/`re_pri` token list, silently dropping
/// unrecognized tokens while keeping the rest.
pub fn parse_priorities<'a>(tokens: impl IntoIterator<Item = &'a str>) -> Vec<Priority> {
    tokens.into_iter().filter_map(parse_priority).collect()
}

/// The "common flag" rule: `ichi` with level ≤ 2, OR `news` with level ≤ 3,
/// OR `spec` with level = 1. This is the sole authoritative source of
/// `is_common` — it never falls back to a precomputed boolean from the
/// source data.
pub fn is_common(priorities: &[Priority]) -> bool {
    priorities.iter().any(|p| match p.priority_type {
        PriorityType::Ichi => p.level <= 2,
        PriorityType::News => p.level <= 3,
        PriorityType::Spec => p.level == 1,
        PriorityType::Gai | PriorityType::Nf => false,
    })
}
