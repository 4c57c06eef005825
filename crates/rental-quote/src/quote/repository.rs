use super::domain::Reservation;

/// Read access to the reservation list owned by the management surface.
pub trait ReservationRepository: Send + Sync {
    /// Current reservations, cancelled ones included.
    fn snapshot(&self) -> Result<Vec<Reservation>, RepositoryError>;
    fn replace(&self, reservations: Vec<Reservation>) -> Result<(), RepositoryError>;
}

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("reservation store unavailable: {0}")]
    Unavailable(String),
}
