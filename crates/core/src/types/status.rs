//! Enumerations shared by the storefront, the back-office and the database.

use core::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Physical condition of a salvaged part.
///
/// Serialized with the Portuguese labels shown to customers; the database
/// enum `shop.product_condition` stores the same strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(feature = "postgres", sqlx(type_name = "shop.product_condition"))]
pub enum Condition {
    Novo,
    #[default]
    Usado,
    Recondicionado,
}

impl Condition {
    pub const ALL: [Self; 3] = [Self::Novo, Self::Usado, Self::Recondicionado];

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Novo => "Novo",
            Self::Usado => "Usado",
            Self::Recondicionado => "Recondicionado",
        }
    }
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Condition {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.label() == s)
            .ok_or_else(|| ParseEnumError::new("condition", s))
    }
}

/// Whether a part can still be reserved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.product_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    #[default]
    Available,
    Sold,
}

impl ProductStatus {
    pub const ALL: [Self; 2] = [Self::Available, Self::Sold];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Sold => "sold",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Available => "Disponível",
            Self::Sold => "Vendido",
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProductStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(Self::Available),
            "sold" => Ok(Self::Sold),
            _ => Err(ParseEnumError::new("product status", s)),
        }
    }
}

/// Lifecycle of a lead.
///
/// ```text
/// new ──► contacted ──► completed
///  │          │
///  │          └───────► cancelled
///  ├──────────────────► completed
///  └──────────────────► cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "shop.reservation_status", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    #[default]
    New,
    Contacted,
    Completed,
    Cancelled,
}

/// A status change that the lifecycle does not allow.
#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("cannot move reservation from {from} to {to}")]
pub struct TransitionError {
    pub from: ReservationStatus,
    pub to: ReservationStatus,
}

impl ReservationStatus {
    pub const ALL: [Self; 4] = [Self::New, Self::Contacted, Self::Completed, Self::Cancelled];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "new",
            Self::Contacted => "contacted",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Label on the customer's "Minhas Reservas" page.
    #[must_use]
    pub const fn customer_label(self) -> &'static str {
        match self {
            Self::New => "Aguardando Contato",
            Self::Contacted => "Em Negociação",
            Self::Completed => "Venda Concluída",
            Self::Cancelled => "Cancelada",
        }
    }

    /// Label on the back-office dashboard.
    #[must_use]
    pub const fn admin_label(self) -> &'static str {
        match self {
            Self::New => "Pendente",
            Self::Contacted => "Em contato",
            Self::Completed => "Atendido",
            Self::Cancelled => "Cancelado",
        }
    }

    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }

    #[must_use]
    pub const fn can_transition_to(self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::New, Self::Contacted | Self::Completed | Self::Cancelled)
                | (Self::Contacted, Self::Completed | Self::Cancelled)
        )
    }

    /// Validate a move to `next`.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError`] for same-state moves and any move out of a
    /// terminal state.
    pub const fn transition_to(self, next: Self) -> Result<Self, TransitionError> {
        if self.can_transition_to(next) {
            Ok(next)
        } else {
            Err(TransitionError {
                from: self,
                to: next,
            })
        }
    }

    /// States reachable from here, for rendering action buttons.
    #[must_use]
    pub fn next_states(self) -> Vec<Self> {
        Self::ALL
            .into_iter()
            .filter(|s| self.can_transition_to(*s))
            .collect()
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| ParseEnumError::new("reservation status", s))
    }
}

/// Back-office permission level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "postgres", derive(sqlx::Type))]
#[cfg_attr(
    feature = "postgres",
    sqlx(type_name = "admin.admin_role", rename_all = "snake_case")
)]
#[serde(rename_all = "snake_case")]
pub enum AdminRole {
    /// Can edit products, settings and lead status.
    Admin,
    /// Read-only access.
    Viewer,
}

impl AdminRole {
    #[must_use]
    pub const fn can_edit(self) -> bool {
        matches!(self, Self::Admin)
    }
}

impl fmt::Display for AdminRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Admin => f.write_str("admin"),
            Self::Viewer => f.write_str("viewer"),
        }
    }
}

impl FromStr for AdminRole {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "viewer" => Ok(Self::Viewer),
            _ => Err(ParseEnumError::new("admin role", s)),
        }
    }
}

/// Unknown value for one of the enums above.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("invalid {kind}: {value}")]
pub struct ParseEnumError {
    kind: &'static str,
    value: String,
}

impl ParseEnumError {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_owned(),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn new_reservation_can_move_anywhere_else() {
        for next in [
            ReservationStatus::Contacted,
            ReservationStatus::Completed,
            ReservationStatus::Cancelled,
        ] {
            assert_eq!(ReservationStatus::New.transition_to(next), Ok(next));
        }
    }

    #[test]
    fn contacted_cannot_go_back_to_new() {
        let err = ReservationStatus::Contacted
            .transition_to(ReservationStatus::New)
            .unwrap_err();
        assert_eq!(err.from, ReservationStatus::Contacted);
        assert_eq!(err.to, ReservationStatus::New);
    }

    #[test]
    fn terminal_states_are_final() {
        for terminal in [ReservationStatus::Completed, ReservationStatus::Cancelled] {
            assert!(terminal.is_terminal());
            assert!(terminal.next_states().is_empty());
        }
    }

    #[test]
    fn same_state_is_rejected() {
        for s in ReservationStatus::ALL {
            assert!(s.transition_to(s).is_err());
        }
    }

    #[test]
    fn next_states_for_dashboard_buttons() {
        assert_eq!(
            ReservationStatus::Contacted.next_states(),
            vec![ReservationStatus::Completed, ReservationStatus::Cancelled]
        );
    }

    #[test]
    fn labels_match_storefront_copy() {
        assert_eq!(ReservationStatus::New.customer_label(), "Aguardando Contato");
        assert_eq!(ReservationStatus::Completed.admin_label(), "Atendido");
        assert_eq!(ProductStatus::Sold.label(), "Vendido");
    }

    #[test]
    fn condition_serializes_with_portuguese_label() {
        assert_eq!(
            serde_json::to_string(&Condition::Recondicionado).unwrap(),
            "\"Recondicionado\""
        );
        assert_eq!("Novo".parse::<Condition>().unwrap(), Condition::Novo);
        assert!("novo".parse::<Condition>().is_err());
    }

    #[test]
    fn admin_role_round_trips_through_display() {
        for role in [AdminRole::Admin, AdminRole::Viewer] {
            assert_eq!(role.to_string().parse::<AdminRole>().unwrap(), role);
        }
        assert!(AdminRole::Admin.can_edit());
        assert!(!AdminRole::Viewer.can_edit());
    }
}
