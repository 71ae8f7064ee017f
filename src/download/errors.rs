/// Download error category for user-facing messages
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DownloadErrorCategory {
    File,    // Local filesystem problems
    Network, // Connection errors
    Server,  // Remote side refused or misbehaved
    User,    // Cancelled by the user or browser shutdown
    Unknown,
}

/// Enriched information about an interrupt reason reported by the download service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadErrorInfo {
    pub code: String,
    pub category: DownloadErrorCategory,
    pub description: String,
    pub is_retryable: bool,
}

impl DownloadErrorInfo {
    /// Create from an interrupt reason code such as `NETWORK_FAILED`
    pub fn from_code(code: &str) -> Self {
        let (category, description, is_retryable) = match code {
            "FILE_FAILED" => (DownloadErrorCategory::File, "File write failed", true),
            "FILE_ACCESS_DENIED" => (DownloadErrorCategory::File, "Access denied", false),
            "FILE_NO_SPACE" => (DownloadErrorCategory::File, "Disk full", false),
            "FILE_NAME_TOO_LONG" => (DownloadErrorCategory::File, "File name too long", false),
            "FILE_TOO_LARGE" => (DownloadErrorCategory::File, "File too large", false),
            "FILE_VIRUS_INFECTED" => (DownloadErrorCategory::File, "Blocked by virus scan", false),
            "FILE_TRANSIENT_ERROR" => (DownloadErrorCategory::File, "Temporary file error", true),
            "FILE_BLOCKED" => (DownloadErrorCategory::File, "Blocked by policy", false),
            "FILE_SECURITY_CHECK_FAILED" => {
                (DownloadErrorCategory::File, "Security check failed", false)
            }
            "FILE_TOO_SHORT" => (DownloadErrorCategory::File, "File truncated", true),
            "FILE_HASH_MISMATCH" => (DownloadErrorCategory::File, "Hash mismatch", true),
            "FILE_SAME_AS_SOURCE" => (DownloadErrorCategory::File, "Same as source", false),
            "NETWORK_FAILED" => (DownloadErrorCategory::Network, "Network failure", true),
            "NETWORK_TIMEOUT" => (DownloadErrorCategory::Network, "Network timeout", true),
            "NETWORK_DISCONNECTED" => (DownloadErrorCategory::Network, "Disconnected", true),
            "NETWORK_SERVER_DOWN" => (DownloadErrorCategory::Network, "Server down", true),
            "NETWORK_INVALID_REQUEST" => {
                (DownloadErrorCategory::Network, "Invalid request", false)
            }
            "SERVER_FAILED" => (DownloadErrorCategory::Server, "Server error", true),
            "SERVER_NO_RANGE" => (DownloadErrorCategory::Server, "Range not supported", true),
            "SERVER_BAD_CONTENT" => (DownloadErrorCategory::Server, "File not found", false),
            "SERVER_UNAUTHORIZED" => (DownloadErrorCategory::Server, "Unauthorized", false),
            "SERVER_CERT_PROBLEM" => (DownloadErrorCategory::Server, "Certificate problem", false),
            "SERVER_FORBIDDEN" => (DownloadErrorCategory::Server, "Forbidden", false),
            "SERVER_UNREACHABLE" => (DownloadErrorCategory::Server, "Server unreachable", true),
            "SERVER_CONTENT_LENGTH_MISMATCH" => {
                (DownloadErrorCategory::Server, "Content length mismatch", true)
            }
            "SERVER_CROSS_ORIGIN_REDIRECT" => {
                (DownloadErrorCategory::Server, "Cross-origin redirect", false)
            }
            "USER_CANCELED" => (DownloadErrorCategory::User, "Cancelled", false),
            "USER_SHUTDOWN" => (DownloadErrorCategory::User, "Browser shut down", true),
            "CRASH" => (DownloadErrorCategory::User, "Browser crashed", true),
            _ => (DownloadErrorCategory::Unknown, "Unknown error", false),
        };

        Self {
            code: code.to_string(),
            category,
            description: description.to_string(),
            is_retryable,
        }
    }

    /// Format for display
    pub fn format(&self) -> String {
        format!("{} ({})", self.description, self.code)
    }
}
