//! Where tile bytes come from.

use std::io::Read;
use std::time::Duration;

use tileglobe_projection::TileId;

use crate::error::TileFetchError;
use crate::template::TileUrlTemplate;

/// Upper bound on a single tile response. Raster tiles are tens of KiB.
const MAX_TILE_BYTES: u64 = 8 * 1024 * 1024;

/// A provider of encoded tile images.
///
/// Implementations are shared across fetch workers, so they must be
/// thread-safe.
pub trait TileSource: Send + Sync {
    /// Fetch the encoded image (PNG, JPEG, ...) for `tile`.
    fn fetch(&self, tile: TileId) -> Result<Vec<u8>, TileFetchError>;
}

/// Fetches tiles over HTTP(S) from an XYZ tile server.
pub struct HttpTileSource {
    agent: ureq::Agent,
    template: TileUrlTemplate,
}

impl HttpTileSource {
    /// Create a source for `template`.
    ///
    /// Public tile servers (OpenStreetMap in particular) reject requests
    /// without an identifying `user_agent`.
    pub fn new(template: TileUrlTemplate, user_agent: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new()
            .user_agent(user_agent)
            .timeout(timeout)
            .build();
        Self { agent, template }
    }

    #[must_use]
    pub fn template(&self) -> &TileUrlTemplate {
        &self.template
    }
}

impl TileSource for HttpTileSource {
    fn fetch(&self, tile: TileId) -> Result<Vec<u8>, TileFetchError> {
        let url = self.template.url(tile);
        tracing::debug!(%tile, %url, "requesting tile");

        let response = match self.agent.get(&url).call() {
            Ok(response) => response,
            Err(ureq::Error::Status(code, _)) => {
                return Err(TileFetchError::Status { tile, code });
            }
            Err(ureq::Error::Transport(transport)) => {
                return Err(TileFetchError::Transport {
                    tile,
                    message: transport.to_string(),
                });
            }
        };

        let mut bytes = Vec::new();
        response
            .into_reader()
            .take(MAX_TILE_BYTES)
            .read_to_end(&mut bytes)
            .map_err(|source| TileFetchError::Io { tile, source })?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_source_keeps_template() {
        let template = TileUrlTemplate::parse("http://127.0.0.1:9/{z}/{x}/{y}.png").unwrap();
        let source =
            HttpTileSource::new(template.clone(), "tileglobe-test", Duration::from_secs(1));
        assert_eq!(source.template(), &template);
    }

    #[test]
    fn test_unreachable_server_is_transport_error() {
        // Port 9 (discard) is closed on test machines; connection is refused.
        let template = TileUrlTemplate::parse("http://127.0.0.1:9/{z}/{x}/{y}.png").unwrap();
        let source = HttpTileSource::new(template, "tileglobe-test", Duration::from_secs(2));
        let tile = TileId::new(0, 0, 0).unwrap();
        let err = source.fetch(tile).unwrap_err();
        assert!(
            matches!(err, TileFetchError::Transport { .. }),
            "unexpected error: {err}"
        );
    }
}
