//! Blocking JSON client for the code-hosting service.
//!
//! Only the handful of endpoints the workspace tools need: repository
//! search/create/rename, namespaces, and SSH key upload. All calls block;
//! a hung network call hangs the tool — accepted, there is no timeout
//! story here.

use serde::Deserialize;

use crate::error::RemoteError;

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// One repository as the service describes it.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RepoDescriptor {
    pub id: u64,
    pub name: String,
    pub path_with_namespace: String,
    pub ssh_url_to_repo: String,
    pub http_url_to_repo: String,
    pub namespace: Namespace,
}

impl RepoDescriptor {
    /// The clone URL in the operator's preferred flavour.
    pub fn url(&self, prefer_ssh: bool) -> &str {
        if prefer_ssh {
            &self.ssh_url_to_repo
        } else {
            &self.http_url_to_repo
        }
    }
}

/// A group or user namespace repositories live under.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Namespace {
    pub id: u64,
    pub name: String,
    pub path: String,
}

/// An SSH key registered with the service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct RemoteSshKey {
    pub id: u64,
    pub title: String,
    pub key: String,
}

// ---------------------------------------------------------------------------
// Client
// ---------------------------------------------------------------------------

const PER_PAGE: usize = 100;

/// Authenticated client for one hosting service instance.
pub struct HostClient {
    host: String,
    token: String,
    agent: ureq::Agent,
}

impl HostClient {
    pub fn new(host: impl Into<String>, token: impl Into<String>) -> Self {
        let mut host = host.into();
        while host.ends_with('/') {
            host.pop();
        }
        Self {
            host,
            token: token.into(),
            agent: ureq::agent(),
        }
    }

    fn get(&self, path: &str) -> ureq::Request {
        self.agent
            .get(&format!("{}/api/v4{path}", self.host))
            .set("PRIVATE-TOKEN", &self.token)
    }

    fn post(&self, path: &str) -> ureq::Request {
        self.agent
            .post(&format!("{}/api/v4{path}", self.host))
            .set("PRIVATE-TOKEN", &self.token)
    }

    fn put(&self, path: &str) -> ureq::Request {
        self.agent
            .put(&format!("{}/api/v4{path}", self.host))
            .set("PRIVATE-TOKEN", &self.token)
    }

    /// Fetch every page of a list endpoint.
    fn get_all<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, RemoteError> {
        let mut out = Vec::new();
        let mut page = 1;
        loop {
            let joiner = if path.contains('?') { '&' } else { '?' };
            let response = self
                .get(&format!("{path}{joiner}per_page={PER_PAGE}&page={page}"))
                .call()?;
            let batch: Vec<T> = response.into_json().map_err(RemoteError::Decode)?;
            let done = batch.len() < PER_PAGE;
            out.extend(batch);
            if done {
                return Ok(out);
            }
            page += 1;
        }
    }

    /// Every repository the token can see.
    pub fn list_repos(&self) -> Result<Vec<RepoDescriptor>, RemoteError> {
        self.get_all("/projects?membership=true")
    }

    /// Find the repository named exactly `name`.
    ///
    /// The server search also matches substrings, so results are
    /// post-filtered with [`select_exact`]. With a namespace the match is
    /// unique by construction; without one, multiple exact matches are
    /// `RemoteError::Ambiguous`.
    pub fn find_repo(
        &self,
        name: &str,
        namespace: Option<&str>,
    ) -> Result<Option<RepoDescriptor>, RemoteError> {
        let candidates: Vec<RepoDescriptor> = self.get_all(&format!("/projects?search={name}"))?;
        let mut matches: Vec<RepoDescriptor> = select_exact(&candidates, name, namespace)
            .into_iter()
            .cloned()
            .collect();
        match matches.len() {
            0 => Ok(None),
            1 => Ok(Some(matches.remove(0))),
            count => Err(RemoteError::Ambiguous {
                name: name.to_string(),
                count,
            }),
        }
    }

    /// Create a repository, optionally inside a group namespace, and return
    /// its descriptor.
    pub fn create_repo(
        &self,
        name: &str,
        namespace_id: Option<u64>,
    ) -> Result<RepoDescriptor, RemoteError> {
        let response = match namespace_id {
            Some(ns) => self.post("/projects").send_form(&[
                ("name", name),
                ("namespace_id", &ns.to_string()),
            ])?,
            None => self.post("/projects").send_form(&[("name", name)])?,
        };
        response.into_json().map_err(RemoteError::Decode)
    }

    /// Rename a repository (name and path together, so clone URLs follow).
    pub fn rename_repo(&self, id: u64, new_name: &str) -> Result<(), RemoteError> {
        self.put(&format!("/projects/{id}"))
            .send_form(&[("name", new_name), ("path", new_name)])?;
        Ok(())
    }

    /// Every namespace the operator can create repositories in.
    pub fn list_namespaces(&self) -> Result<Vec<Namespace>, RemoteError> {
        self.get_all("/namespaces")
    }

    /// SSH keys registered for the authenticated user.
    pub fn list_ssh_keys(&self) -> Result<Vec<RemoteSshKey>, RemoteError> {
        self.get_all("/user/keys")
    }

    /// Register a public key for the authenticated user.
    pub fn add_ssh_key(&self, title: &str, key: &str) -> Result<(), RemoteError> {
        self.post("/user/keys")
            .send_form(&[("title", title), ("key", key)])?;
        Ok(())
    }
}

/// Exact-name filter over search results; with `namespace` the full
/// `namespace/name` path must match.
pub fn select_exact<'a>(
    candidates: &'a [RepoDescriptor],
    name: &str,
    namespace: Option<&str>,
) -> Vec<&'a RepoDescriptor> {
    match namespace {
        Some(ns) => {
            let wanted = format!("{ns}/{name}");
            candidates
                .iter()
                .filter(|r| r.path_with_namespace == wanted)
                .collect()
        }
        None => candidates.iter().filter(|r| r.name == name).collect(),
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn repo(name: &str, ns: &str) -> RepoDescriptor {
        RepoDescriptor {
            id: 7,
            name: name.to_string(),
            path_with_namespace: format!("{ns}/{name}"),
            ssh_url_to_repo: format!("git@host:{ns}/{name}.git"),
            http_url_to_repo: format!("https://host/{ns}/{name}.git"),
            namespace: Namespace {
                id: 1,
                name: ns.to_string(),
                path: ns.to_string(),
            },
        }
    }

    #[test]
    fn exact_filter_drops_substring_matches() {
        let candidates = vec![repo("nav", "team"), repo("nav_planner", "team")];
        let matches = select_exact(&candidates, "nav", None);
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].name, "nav");
    }

    #[test]
    fn namespace_filter_matches_full_path() {
        let candidates = vec![repo("nav", "team"), repo("nav", "sandbox")];
        let matches = select_exact(&candidates, "nav", Some("sandbox"));
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].path_with_namespace, "sandbox/nav");
        assert!(select_exact(&candidates, "nav", Some("elsewhere")).is_empty());
    }

    #[test]
    fn url_prefers_configured_flavour() {
        let r = repo("nav", "team");
        assert_eq!(r.url(true), "git@host:team/nav.git");
        assert_eq!(r.url(false), "https://host/team/nav.git");
    }

    #[test]
    fn descriptor_deserializes_from_service_payload() {
        let payload = r#"{
            "id": 42,
            "name": "nav",
            "path_with_namespace": "team/nav",
            "ssh_url_to_repo": "git@host:team/nav.git",
            "http_url_to_repo": "https://host/team/nav.git",
            "namespace": {"id": 3, "name": "team", "path": "team", "kind": "group"},
            "unrelated_field": true
        }"#;
        let r: RepoDescriptor = serde_json::from_str(payload).expect("deserialize");
        assert_eq!(r.id, 42);
        assert_eq!(r.namespace.name, "team");
    }
}
