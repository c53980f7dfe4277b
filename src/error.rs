use thiserror::Error;

/// Crate-wide result type alias.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for particle-list construction and ingestion.
///
/// Lineage queries never produce an `Error`: an unknown position or track id is an
/// expected condition and is reported through `INVALID_TRACK_ID` or `Option` instead.
#[derive(Debug, Error)]
pub enum Error {
    /// Particle batch and origin batch are not positionally aligned.
    #[error("input contract violated: {particles} particles but {origins} origins")]
    InputContract { particles: usize, origins: usize },

    /// The geometry source supplied no sub-volumes to build a fiducial volume from.
    #[error("geometry has no sub-volumes; cannot build a fiducial volume")]
    EmptyGeometry,

    /// Invalid parameter (bad sub-volume extents, bad config values).
    #[error("invalid parameter: {0}")]
    InvalidParam(String),

    /// Malformed TOML configuration.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),

    /// Propagated I/O errors (config files).
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn input_contract_display_names_both_lengths() {
        let e = Error::InputContract {
            particles: 3,
            origins: 2,
        };
        let msg = format!("{e}");
        assert!(msg.contains("input contract"));
        assert!(msg.contains('3'));
        assert!(msg.contains('2'));
    }

    #[test]
    fn io_error_converts() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing.toml");
        let e: Error = io.into();
        assert!(matches!(e, Error::Io(_)));
        assert!(e.to_string().contains("missing.toml"));
    }

    #[test]
    fn result_type_alias_compiles() -> Result<()> {
        Ok(())
    }
}
