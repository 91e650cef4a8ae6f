//! Define our own macro to simplify the code
//!

/// Call the HTTP client with the proper arguments
///
/// - unauth GET call, the feed is public
///
#[macro_export]
macro_rules! http_get {
    ($client:expr, $url:expr) => {
        $client
            .get($url)
            .header(
                "user-agent",
                format!("{}/{}", clap::crate_name!(), clap::crate_version!()),
            )
            .header("accept", "application/json")
            .send()
    };
}
