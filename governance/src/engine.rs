//! Governance orchestrator: the public operations composed from the
//! config store, capability registry, authorization gate and voting gate.
//!
//! Every operation runs to completion under `&mut self` and checks all of its
//! own preconditions before the first write, so a failed call leaves the
//! instance untouched.

use crate::approval::ApprovedExecutionSet;
use crate::capability::{Capability, CapabilityKey, CapabilityRegistry};
use crate::config::{ConfigStore, GovernanceConfig};
use crate::error::GovernanceError;
use crate::events::{EventBus, GovernanceEvent};
use crate::settings::GovernanceSettings;
use crate::snapshot::GovernanceSnapshot;
use crate::voting::{self, VoteReceipt};
use quorum_ballot::{BallotLedger, NewProposal, ProposalMetadata, ProposalState};
use quorum_membership::{CredentialAddress, CredentialIssuer, VOTING_POWER};
use quorum_types::{AccountAddress, ExecutionHash, ProposalId, Timestamp};
use tracing::info;

/// Upper bound on each metadata field, in bytes.
pub const MAX_METADATA_LEN: usize = 256;

/// One governance instance: owned state plus its two collaborators.
pub struct Governance<L, M> {
    system_identity: AccountAddress,
    config: ConfigStore,
    capabilities: CapabilityRegistry,
    approvals: ApprovedExecutionSet,
    ledger: L,
    members: M,
    events: EventBus,
}

impl<L: BallotLedger, M: CredentialIssuer> Governance<L, M> {
    /// Bootstrap an instance. The registry starts with the system identity's own
    /// capability under `system_key`.
    pub fn new(
        system_identity: AccountAddress,
        system_key: CapabilityKey,
        config: GovernanceConfig,
        ledger: L,
        members: M,
    ) -> Result<Self, GovernanceError> {
        config.validate()?;
        info!(system = %system_identity, key = %system_key, "governance instance bootstrapped");
        Ok(Self {
            config: ConfigStore::new(system_identity.clone(), config),
            capabilities: CapabilityRegistry::bootstrap(system_identity.clone(), system_key),
            approvals: ApprovedExecutionSet::new(),
            system_identity,
            ledger,
            members,
            events: EventBus::new(),
        })
    }

    pub fn from_settings(
        settings: &GovernanceSettings,
        ledger: L,
        members: M,
    ) -> Result<Self, GovernanceError> {
        Self::new(
            settings.system_identity.clone(),
            settings.system_capability_key(),
            settings.initial_config(),
            ledger,
            members,
        )
    }

    /// Rebuild an instance from persisted state.
    pub fn restore(snapshot: GovernanceSnapshot, ledger: L, members: M) -> Result<Self, GovernanceError> {
        snapshot.config.validate()?;
        let system_identity = snapshot.system_identity;
        Ok(Self {
            config: ConfigStore::new(system_identity.clone(), snapshot.config),
            capabilities: CapabilityRegistry::from_entries(
                system_identity.clone(),
                snapshot.capabilities,
            ),
            approvals: ApprovedExecutionSet::from_entries(snapshot.approvals),
            system_identity,
            ledger,
            members,
            events: EventBus::new(),
        })
    }

    pub fn snapshot(&self) -> GovernanceSnapshot {
        GovernanceSnapshot {
            system_identity: self.system_identity.clone(),
            config: self.config.read_config(),
            capabilities: self.capabilities.entries().clone(),
            approvals: self.approvals.entries().clone(),
        }
    }

    // ── Proposals ───────────────────────────────────────────────────────

    /// Open a proposal on behalf of a member with proposing rights.
    pub fn create_proposal(
        &mut self,
        proposer: &AccountAddress,
        execution_hash: ExecutionHash,
        metadata_location: Vec<u8>,
        metadata_hash: Vec<u8>,
        is_multi_step: bool,
        now: Timestamp,
    ) -> Result<ProposalId, GovernanceError> {
        let credential = self.proposal_ability_check(proposer)?;
        if metadata_location.len() > MAX_METADATA_LEN {
            return Err(GovernanceError::InvalidMetadataLocation {
                len: metadata_location.len(),
                max: MAX_METADATA_LEN,
            });
        }
        if metadata_hash.len() > MAX_METADATA_LEN {
            return Err(GovernanceError::InvalidMetadataHash {
                len: metadata_hash.len(),
                max: MAX_METADATA_LEN,
            });
        }

        let config = self.config.read_config();
        let early_resolution_vote_threshold =
            voting::compute_early_resolution_threshold(&self.members);
        let metadata = ProposalMetadata {
            location: metadata_location,
            hash: metadata_hash,
        };
        let proposal_id = self.ledger.create_proposal(
            NewProposal {
                proposer: proposer.clone(),
                execution_hash: execution_hash.clone(),
                min_vote_threshold: config.minimum_voting_threshold,
                expiration: now.plus_secs(config.voting_duration_seconds),
                early_resolution_vote_threshold,
                metadata: metadata.clone(),
                is_multi_step,
            },
            now,
        )?;

        info!(
            proposal_id,
            proposer = %proposer,
            hash = %execution_hash,
            ?early_resolution_vote_threshold,
            is_multi_step,
            "proposal created"
        );
        self.events.emit(GovernanceEvent::ProposalCreated {
            proposer: proposer.clone(),
            credential,
            proposal_id,
            execution_hash,
            metadata_location: metadata.location,
            metadata_hash: metadata.hash,
            is_multi_step,
        });
        Ok(proposal_id)
    }

    /// Cast `voter`'s weighted vote.
    pub fn vote(
        &mut self,
        voter: &AccountAddress,
        proposal_id: ProposalId,
        should_pass: bool,
        now: Timestamp,
    ) -> Result<VoteReceipt, GovernanceError> {
        let receipt = voting::cast_vote(
            &mut self.ledger,
            &mut self.members,
            voter,
            proposal_id,
            should_pass,
            now,
        )?;
        self.events.emit(GovernanceEvent::Voted {
            proposal_id,
            voter: receipt.voter.clone(),
            voting_power: receipt.voting_power,
            should_pass,
        });
        Ok(receipt)
    }

    /// Clear a succeeded proposal's current execution hash to run.
    pub fn add_approved_script_hash(
        &mut self,
        proposal_id: ProposalId,
        now: Timestamp,
    ) -> Result<ExecutionHash, GovernanceError> {
        let execution_hash = self.approvals.approve(&self.ledger, proposal_id, now)?;
        self.events.emit(GovernanceEvent::ExecutionHashApproved {
            proposal_id,
            execution_hash: execution_hash.clone(),
        });
        Ok(execution_hash)
    }

    /// Resolve a single-step proposal and hand back the requested capability.
    ///
    /// `script_hash` is the hash of the artifact doing the resolving; the
    /// ballot ledger checks it against the proposal.
    pub fn resolve(
        &mut self,
        proposal_id: ProposalId,
        capability_key: &str,
        capability_description: &str,
        script_hash: &ExecutionHash,
        now: Timestamp,
    ) -> Result<Capability, GovernanceError> {
        self.approvals.ensure_approved(proposal_id)?;
        let capability = self
            .capabilities
            .get_capability(capability_key, capability_description)?;

        self.ledger.resolve(proposal_id, script_hash, now)?;
        self.approvals.close(proposal_id)?;

        self.emit_resolved(proposal_id, capability_key, capability_description);
        Ok(capability)
    }

    /// Resolve one step of a multi-step proposal.
    ///
    /// An empty `next_execution_hash` finishes the proposal and closes its
    /// approval; otherwise the approval moves to the next hash.
    pub fn resolve_multi_step_proposal(
        &mut self,
        proposal_id: ProposalId,
        capability_key: &str,
        capability_description: &str,
        script_hash: &ExecutionHash,
        next_execution_hash: &ExecutionHash,
        now: Timestamp,
    ) -> Result<Capability, GovernanceError> {
        self.approvals.ensure_approved(proposal_id)?;
        let capability = self
            .capabilities
            .get_capability(capability_key, capability_description)?;
        if !next_execution_hash.is_empty() {
            ApprovedExecutionSet::check_approvable(&self.ledger, proposal_id, now)?;
        }

        self.ledger
            .resolve_with_next_hash(proposal_id, script_hash, next_execution_hash, now)?;
        if next_execution_hash.is_empty() {
            self.approvals.close(proposal_id)?;
        } else {
            self.add_approved_script_hash(proposal_id, now)?;
        }

        self.emit_resolved(proposal_id, capability_key, capability_description);
        Ok(capability)
    }

    fn emit_resolved(&self, proposal_id: ProposalId, key: &str, description: &str) {
        info!(proposal_id, capability = %CapabilityKey::new(key, description), "proposal resolved");
        self.events.emit(GovernanceEvent::ProposalResolved {
            proposal_id,
            capability_key: key.to_string(),
            capability_description: description.to_string(),
        });
    }

    // ── System-identity mutations ───────────────────────────────────────

    /// Replace both governance parameters. Returns the previous config.
    pub fn update_governance_config(
        &mut self,
        caller: &AccountAddress,
        new_minimum_voting_threshold: u128,
        new_voting_duration_seconds: u64,
    ) -> Result<GovernanceConfig, GovernanceError> {
        let old = self.config.update_config(
            caller,
            new_minimum_voting_threshold,
            new_voting_duration_seconds,
        )?;
        self.events.emit(GovernanceEvent::ConfigUpdated {
            old_minimum_voting_threshold: old.minimum_voting_threshold,
            new_minimum_voting_threshold,
            old_voting_duration_seconds: old.voting_duration_seconds,
            new_voting_duration_seconds,
        });
        Ok(old)
    }

    /// Register or replace the capability stored under `(key, description)`.
    pub fn update_governance_responsibility(
        &mut self,
        caller: &AccountAddress,
        key: &str,
        description: &str,
        capability: Capability,
    ) -> Result<Option<CapabilityKey>, GovernanceError> {
        let old = self
            .capabilities
            .upsert_capability(caller, key, description, capability)?;
        self.events.emit(GovernanceEvent::CapabilityUpdated {
            old: old.clone(),
            new: CapabilityKey::new(key, description),
        });
        Ok(old)
    }

    // ── Views ───────────────────────────────────────────────────────────

    /// Credential address of `identity` if it may create proposals.
    pub fn proposal_ability_check(
        &self,
        identity: &AccountAddress,
    ) -> Result<CredentialAddress, GovernanceError> {
        let credential = voting::resolve_member(&self.members, identity)?;
        voting::proposal_ability_check(&self.members, identity, &credential)?;
        Ok(credential)
    }

    pub fn config(&self) -> GovernanceConfig {
        self.config.read_config()
    }

    pub fn system_identity(&self) -> &AccountAddress {
        &self.system_identity
    }

    pub fn capability(&self, key: &str, description: &str) -> Result<Capability, GovernanceError> {
        self.capabilities.get_capability(key, description)
    }

    pub fn approved_execution_hash(&self, proposal_id: ProposalId) -> Option<&ExecutionHash> {
        self.approvals.get(proposal_id)
    }

    pub fn approvals(&self) -> &ApprovedExecutionSet {
        &self.approvals
    }

    pub fn has_voted(
        &self,
        identity: &AccountAddress,
        proposal_id: ProposalId,
    ) -> Result<bool, GovernanceError> {
        let credential = voting::resolve_member(&self.members, identity)?;
        Ok(self.members.vote_record_contains(&credential, proposal_id)?)
    }

    pub fn voting_power(&self, identity: &AccountAddress) -> Result<u64, GovernanceError> {
        let credential = voting::resolve_member(&self.members, identity)?;
        Ok(self.members.read_u64_attribute(&credential, VOTING_POWER)?)
    }

    pub fn proposal_state(
        &self,
        proposal_id: ProposalId,
        now: Timestamp,
    ) -> Result<ProposalState, GovernanceError> {
        Ok(self.ledger.get_state(proposal_id, now)?)
    }

    pub fn next_proposal_id(&self) -> ProposalId {
        self.ledger.next_proposal_id()
    }

    pub fn ledger(&self) -> &L {
        &self.ledger
    }

    /// Direct access to the ledger collaborator, for its own maintenance.
    pub fn ledger_mut(&mut self) -> &mut L {
        &mut self.ledger
    }

    pub fn members(&self) -> &M {
        &self.members
    }

    /// Direct access to the credential issuer, for issuance and burning.
    pub fn members_mut(&mut self) -> &mut M {
        &mut self.members
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }
}

impl<L, M> std::fmt::Debug for Governance<L, M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Governance")
            .field("system_identity", &self.system_identity)
            .field("config", &self.config)
            .field("capabilities", &self.capabilities.len())
            .field("approvals", &self.approvals.len())
            .finish()
    }
}
