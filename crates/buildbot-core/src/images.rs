//! Docker image tag computation.

/// Projects that publish more than one image per build, keyed by image base name.
const MULTI_IMAGE_OVERRIDES: &[(&str, &[&str])] = &[
    ("prysm", &["prysm-beacon-chain", "prysm-validator"]),
    ("nimbus-eth2", &["nimbus-eth2", "nimbus-validator-client"]),
];

/// Computes the image tags a build will publish.
///
/// Builds triggered from a fork are tagged `<fork-owner>-<branch>` so they
/// cannot clobber the upstream branch image.
pub fn image_tags(registry: &str, base: &str, branch: &str, fork_owner: Option<&str>) -> Vec<String> {
    let tag = match fork_owner {
        Some(owner) => format!("{}-{}", owner, branch),
        None => branch.to_string(),
    };

    let names: &[&str] = MULTI_IMAGE_OVERRIDES
        .iter()
        .find(|(name, _)| *name == base)
        .map(|(_, images)| *images)
        .unwrap_or(std::slice::from_ref(&base));

    names
        .iter()
        .map(|name| format!("{}/{}:{}", registry, name, tag))
        .collect()
}
