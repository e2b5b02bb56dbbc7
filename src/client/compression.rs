//! XFEATURE COMPRESS GZIP negotiation
//!
//! After a successful negotiation the server marks each compressed response
//! with `[COMPRESS=GZIP]` in its status message; dispatch to the gzip reader
//! keys off that marker, so no client-side mode state is needed.

use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

use super::NntpClient;
use crate::error::{NntpError, Result};
use crate::response::codes;

impl<S: AsyncRead + AsyncWrite + Unpin> NntpClient<S> {
    /// XFEATURE COMPRESS GZIP command
    ///
    /// Asks the server to gzip-compress its high-volume multi-line
    /// responses. With `terminator` the server is asked to include the
    /// terminating `.\r\n` inside the compressed stream; without it the
    /// sentinel follows the stream raw. Both framings are handled
    /// transparently on read.
    pub async fn xfeature_compress_gzip(&mut self, terminator: bool) -> Result<bool> {
        let args = terminator.then_some("TERMINATOR");
        let (code, message) = self.command("XFEATURE COMPRESS GZIP", args).await?;
        if code != codes::FEATURE_ENABLED {
            return Err(NntpError::reply(code, message));
        }
        debug!("XFEATURE COMPRESS GZIP enabled (terminator: {terminator})");
        Ok(true)
    }
}
