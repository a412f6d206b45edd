//! Shareable packer links

/// 打包员链接
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackingLinks {
    /// Mobile flow, also encoded in the QR code
    pub packer_link: String,
    /// Desktop "packer PC" flow
    pub pc_link: String,
}

impl PackingLinks {
    pub fn new(base_url: &str, token: &str) -> Self {
        let base = base_url.trim_end_matches('/');
        Self {
            packer_link: format!("{base}/packing?token={token}"),
            pc_link: format!("{base}/for-packer?token={token}"),
        }
    }
}
