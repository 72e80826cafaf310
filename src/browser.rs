//! Opening the served URL in the default browser.

use std::io;

/// Open `url` in the system default browser.
///
/// This is best effort: the caller logs a failure and keeps serving, since
/// the server is perfectly usable without the tab (headless hosts, remote
/// shells, machines with no registered browser).
pub fn open_tab(url: &str) -> io::Result<()> {
    open::that(url)
}
