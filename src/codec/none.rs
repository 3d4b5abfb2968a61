//! Write-suppressing sink codec: the pipeline skips output entirely.

use super::Writer;

pub(crate) fn writer() -> Writer {
    Writer::suppressing("none")
}
