use crate::{
    utils::{load_program_account, store_program_account, Witness},
    DEFAULT_OWNERS, GOVERNANCE_QUORUM, OWNER_SLOTS,
};
use anchor_lang::prelude::*;

//
// ──────────────────────────────────────────────────────────────────────────────
// Owner Roster Account
// ──────────────────────────────────────────────────────────────────────────────
//

pub const OWNER_ROSTER_SEED: &str = "owner_roster";

/// Slot names accepted by `switch_owner`, in roster order.
pub const OWNER_SLOT_NAMES: [&str; OWNER_SLOTS] =
    ["owner1", "owner2", "owner3", "owner4", "owner5"];

/// Why a slot switch was declined. Refusals are answers, not errors.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SwitchRefusal {
    QuorumNotMet,
    UnknownSlot,
    InvalidOwner,
}

/// Five governing identities. A privileged operation passes when enough of
/// them co-sign the transaction.
///
/// `initialized` flips to `true` once and never goes back; before that every
/// quorum check fails closed.
#[account]
#[derive(Default, Debug)]
pub struct OwnerRoster {
    pub bump: u8,
    pub initialized: bool,
    pub owners: [Pubkey; 5],
}

impl OwnerRoster {
    /// - 8: discriminator
    /// - 1: bump
    /// - 1: initialized
    /// - 32 * 5: owner slots
    pub const LEN: usize = 8 + 1 + 1 + 32 * OWNER_SLOTS;

    /// Roster stored at `info`, or an uninitialized one if nothing is there yet.
    pub fn load(info: &AccountInfo) -> OwnerRoster {
        load_program_account(info).unwrap_or_default()
    }

    pub fn store(&self, info: &AccountInfo) -> Result<()> {
        store_program_account(self, info)
    }

    /// Seed the roster with `DEFAULT_OWNERS`. Returns `false` if it already was.
    pub fn initialize(&mut self, bump: u8) -> bool {
        if self.initialized {
            return false;
        }
        self.bump = bump;
        self.owners = DEFAULT_OWNERS;
        self.initialized = true;
        true
    }

    /// Counts roster slots whose identity is witnessed and compares against
    /// `threshold`. Never errors.
    pub fn check_quorum<W: Witness + ?Sized>(&self, witnesses: &W, threshold: usize) -> bool {
        if !self.initialized {
            return false;
        }
        let present = self
            .owners
            .iter()
            .filter(|owner| witnesses.is_witnessed(owner))
            .count();
        present >= threshold
    }

    pub fn slot_index(slot: &str) -> Option<usize> {
        OWNER_SLOT_NAMES.iter().position(|name| *name == slot)
    }

    pub fn contains(&self, identity: &Pubkey) -> bool {
        self.owners.contains(identity)
    }

    /// Hand `slot` (`owner1`..`owner5`) to `new_owner` once a governance
    /// quorum has witnessed the call. Returns the slot index and the previous
    /// holder; the roster is untouched on refusal.
    ///
    /// A default key or one that already holds a slot is `InvalidOwner`, so
    /// one identity never counts twice toward a quorum.
    pub fn switch<W: Witness + ?Sized>(
        &mut self,
        witnesses: &W,
        slot: &str,
        new_owner: Pubkey,
    ) -> std::result::Result<(usize, Pubkey), SwitchRefusal> {
        if !self.check_quorum(witnesses, GOVERNANCE_QUORUM) {
            return Err(SwitchRefusal::QuorumNotMet);
        }
        let index = Self::slot_index(slot).ok_or(SwitchRefusal::UnknownSlot)?;
        if new_owner == Pubkey::default() || self.contains(&new_owner) {
            return Err(SwitchRefusal::InvalidOwner);
        }
        let previous = self
            .replace(index, new_owner)
            .ok_or(SwitchRefusal::UnknownSlot)?;
        Ok((index, previous))
    }

    /// Replace the identity in `slot`, returning the previous holder.
    pub fn replace(&mut self, slot: usize, identity: Pubkey) -> Option<Pubkey> {
        let current = self.owners.get_mut(slot)?;
        Some(std::mem::replace(current, identity))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{VERIFICATION_QUORUM, WHITELIST_ADMIN_QUORUM};

    fn initialized() -> OwnerRoster {
        let mut roster = OwnerRoster::default();
        assert!(roster.initialize(254));
        roster
    }

    #[test]
    fn initialize_runs_once() {
        let mut roster = initialized();
        roster.owners[0] = Pubkey::new_unique();
        assert!(!roster.initialize(254));
        assert_ne!(roster.owners[0], DEFAULT_OWNERS[0]);
        assert!(roster.initialized);
    }

    #[test]
    fn uninitialized_roster_fails_every_quorum() {
        let roster = OwnerRoster::default();
        assert!(!roster.check_quorum(&DEFAULT_OWNERS[..], 0));
        assert!(!roster.check_quorum(&DEFAULT_OWNERS[..], 1));
    }

    #[test]
    fn quorum_counts_witnessed_slots() {
        let roster = initialized();
        let three = &DEFAULT_OWNERS[..3];
        assert!(roster.check_quorum(three, WHITELIST_ADMIN_QUORUM));
        assert!(roster.check_quorum(three, GOVERNANCE_QUORUM));
        assert!(!roster.check_quorum(three, VERIFICATION_QUORUM));
        assert!(roster.check_quorum(&DEFAULT_OWNERS[1..], VERIFICATION_QUORUM));
    }

    #[test]
    fn strangers_do_not_count_towards_quorum() {
        let roster = initialized();
        let witnesses = vec![
            DEFAULT_OWNERS[0],
            DEFAULT_OWNERS[1],
            Pubkey::new_unique(),
            Pubkey::new_unique(),
        ];
        assert!(!roster.check_quorum(&witnesses[..], GOVERNANCE_QUORUM));
    }

    #[test]
    fn slot_names_map_to_indices() {
        assert_eq!(OwnerRoster::slot_index("owner1"), Some(0));
        assert_eq!(OwnerRoster::slot_index("owner5"), Some(4));
        assert_eq!(OwnerRoster::slot_index("owner0"), None);
        assert_eq!(OwnerRoster::slot_index("owner6"), None);
        assert_eq!(OwnerRoster::slot_index("Owner1"), None);
    }

    #[test]
    fn replace_swaps_a_single_slot() {
        let mut roster = initialized();
        let newcomer = Pubkey::new_unique();
        assert_eq!(roster.replace(2, newcomer), Some(DEFAULT_OWNERS[2]));
        assert!(roster.contains(&newcomer));
        assert!(!roster.contains(&DEFAULT_OWNERS[2]));
        assert_eq!(roster.replace(OWNER_SLOTS, newcomer), None);
    }

    #[test]
    fn switch_needs_three_owners() {
        let mut roster = initialized();
        let newcomer = Pubkey::new_unique();
        assert_eq!(
            roster.switch(&DEFAULT_OWNERS[..2], "owner1", newcomer),
            Err(SwitchRefusal::QuorumNotMet)
        );
        assert_eq!(
            OwnerRoster::default().switch(&DEFAULT_OWNERS[..], "owner1", newcomer),
            Err(SwitchRefusal::QuorumNotMet)
        );
        assert_eq!(roster.owners, DEFAULT_OWNERS);
    }

    #[test]
    fn switch_refuses_bad_slots_and_owners() {
        let mut roster = initialized();
        let quorum = &DEFAULT_OWNERS[..3];
        let newcomer = Pubkey::new_unique();
        assert_eq!(
            roster.switch(quorum, "owner6", newcomer),
            Err(SwitchRefusal::UnknownSlot)
        );
        assert_eq!(
            roster.switch(quorum, "owner2", DEFAULT_OWNERS[4]),
            Err(SwitchRefusal::InvalidOwner)
        );
        assert_eq!(
            roster.switch(quorum, "owner2", Pubkey::default()),
            Err(SwitchRefusal::InvalidOwner)
        );
        assert_eq!(roster.owners, DEFAULT_OWNERS);
    }

    #[test]
    fn switch_replaces_the_named_slot() {
        let mut roster = initialized();
        let newcomer = Pubkey::new_unique();
        assert_eq!(
            roster.switch(&DEFAULT_OWNERS[2..], "owner4", newcomer),
            Ok((3, DEFAULT_OWNERS[3]))
        );
        assert_eq!(roster.owners[3], newcomer);

        // The replaced owner no longer counts toward quorum.
        let witnesses = [DEFAULT_OWNERS[3], DEFAULT_OWNERS[0], DEFAULT_OWNERS[1]];
        assert!(!roster.check_quorum(&witnesses[..], GOVERNANCE_QUORUM));
    }

    #[test]
    fn default_owners_are_distinct() {
        for (i, a) in DEFAULT_OWNERS.iter().enumerate() {
            assert_ne!(*a, Pubkey::default());
            for b in DEFAULT_OWNERS.iter().skip(i + 1) {
                assert_ne!(a, b);
            }
        }
    }
}
