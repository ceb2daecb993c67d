#[derive(Debug, Clone)]
pub struct ClockifyUrl(String);

impl AsRef<str> for ClockifyUrl {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl ClockifyUrl {
    /// Creates a new ClockifyUrl from a base address, e.g. `https://api.clockify.me/api/v1`.
    pub fn new(base: impl AsRef<str>) -> Self {
        Self(base.as_ref().trim_end_matches('/').to_string())
    }

    /// Append the given path to the URL.
    pub fn append_path(&self, path: &str) -> Self {
        let trimmed_url = self.0.trim_end_matches('/');
        let trimmed_path = path.trim_start_matches('/');
        Self(format!("{}/{}", trimmed_url, trimmed_path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_path_normalizes_slashes() {
        let url = ClockifyUrl::new("https://api.clockify.me/api/v1/");
        assert_eq!(
            url.append_path("/workspaces").as_ref(),
            "https://api.clockify.me/api/v1/workspaces"
        );
    }
}
