//! The compiled-in repository to build-workflow table.
//!
//! Adding a buildable repository is a data change here, nothing else.

use std::collections::HashMap;
use std::sync::OnceLock;

use regex::Regex;

use crate::command::RepositoryId;

/// Upstream repositories and the builder workflow that produces their images.
const WORKFLOWS: &[(&str, &str)] = &[
    ("ethpandaops/armiarma", "build-push-armiarma.yml"),
    ("dapplion/beacon-metrics-gazer", "build-push-beacon-metrics-gazer.yml"),
    ("hyperledger/besu", "build-push-besu.yml"),
    ("ralexstokes/ethereum_consensus_monitor", "build-push-consensus-monitor.yml"),
    ("sigp/eleel", "build-push-eleel.yml"),
    ("ledgerwatch/erigon", "build-push-erigon.yml"),
    ("ethpandaops/ethereum-genesis-generator", "build-push-genesis-generator.yml"),
    ("ethereumjs/ethereumjs-monorepo", "build-push-ethereumjs.yml"),
    ("ethereum/nodemonitor", "build-push-execution-monitor.yml"),
    ("flashbots/builder", "build-push-flashbots-builder.yml"),
    ("ethereum/go-ethereum", "build-push-geth.yml"),
    ("ethpandaops/goomy-blob", "build-push-goomy-blob.yml"),
    ("migalabs/goteth", "build-push-goteth.yml"),
    ("grandinetech/grandine", "build-push-grandine.yml"),
    ("sigp/lighthouse", "build-push-lighthouse.yml"),
    ("chainsafe/lodestar", "build-push-lodestar.yml"),
    ("ralexstokes/mev-rs", "build-push-mev-rs.yml"),
    ("nethermindeth/nethermind", "build-push-nethermind.yml"),
    ("status-im/nimbus-eth1", "build-push-nimbus-eth1.yml"),
    ("status-im/nimbus-eth2", "build-push-nimbus-eth2.yml"),
    ("prysmaticlabs/prysm", "build-push-prysm.yml"),
    ("paradigmxyz/reth", "build-push-reth.yml"),
    ("consensys/teku", "build-push-teku.yml"),
    ("mariusvanderwijden/tx-fuzz", "build-push-tx-fuzz.yml"),
];

static INDEX: OnceLock<HashMap<String, &'static str>> = OnceLock::new();
static WORKFLOW_FILE: OnceLock<Regex> = OnceLock::new();

fn index() -> &'static HashMap<String, &'static str> {
    INDEX.get_or_init(|| {
        WORKFLOWS
            .iter()
            .map(|(repo, workflow)| (repo.to_ascii_lowercase(), *workflow))
            .collect()
    })
}

/// Looks up the workflow file for a repository, ignoring case.
pub fn workflow_for(repository: &RepositoryId) -> Option<&'static str> {
    index().get(&repository.canonical()).copied()
}

/// Extracts the image base name from a workflow file name.
///
/// `build-push-geth.yml` yields `geth`.
pub fn docker_base(workflow: &str) -> Option<&str> {
    let pattern = WORKFLOW_FILE
        .get_or_init(|| Regex::new(r"^build-push-(.+)\.yml$").expect("valid workflow pattern"));
    pattern
        .captures(workflow)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// All repositories with a build workflow, in table order.
pub fn supported_repositories() -> impl Iterator<Item = &'static str> {
    WORKFLOWS.iter().map(|(repo, _)| *repo)
}
