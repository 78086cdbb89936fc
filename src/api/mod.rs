/// Generation endpoint access
///
/// This module handles:
/// - Sending the multipart upload with a bounded timeout (client.rs)
/// - Turning the response into a result location or a typed error (response.rs)
/// - Downloading the generated image for display

pub mod client;
pub mod response;

pub use client::GenerationClient;
