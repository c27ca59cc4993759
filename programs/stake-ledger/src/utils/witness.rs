use anchor_lang::prelude::*;

/// Answers whether an identity authorized the current instruction.
pub trait Witness {
    fn is_witnessed(&self, identity: &Pubkey) -> bool;
}

/// Identities that signed the transaction, as seen through the accounts
/// handed to an instruction.
///
/// Co-signers that have no named slot in an accounts struct (quorum owners,
/// whitelist admins) are passed as signer `remaining_accounts`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WitnessSet {
    signers: Vec<Pubkey>,
}

impl WitnessSet {
    pub fn collect<'a, 'info: 'a>(
        accounts: impl IntoIterator<Item = &'a AccountInfo<'info>>,
    ) -> Self {
        let mut witnesses = Self::default();
        witnesses.absorb(accounts);
        witnesses
    }

    /// Witnesses of an instruction: its named accounts plus `remaining_accounts`.
    pub fn from_context<'info, T>(accounts: &T, remaining_accounts: &[AccountInfo]) -> Self
    where
        T: ToAccountInfos<'info>,
    {
        let mut witnesses = Self::collect(accounts.to_account_infos().iter());
        witnesses.absorb(remaining_accounts.iter());
        witnesses
    }

    fn absorb<'a, 'info: 'a>(
        &mut self,
        accounts: impl IntoIterator<Item = &'a AccountInfo<'info>>,
    ) {
        for info in accounts {
            if info.is_signer && !self.signers.contains(info.key) {
                self.signers.push(*info.key);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.signers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.signers.is_empty()
    }
}

impl Witness for WitnessSet {
    fn is_witnessed(&self, identity: &Pubkey) -> bool {
        self.signers.contains(identity)
    }
}

impl Witness for [Pubkey] {
    fn is_witnessed(&self, identity: &Pubkey) -> bool {
        self.contains(identity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info<'a>(
        key: &'a Pubkey,
        is_signer: bool,
        lamports: &'a mut u64,
        data: &'a mut [u8],
        owner: &'a Pubkey,
    ) -> AccountInfo<'a> {
        AccountInfo::new(key, is_signer, false, lamports, data, owner, false, 0)
    }

    #[test]
    fn only_signers_are_witnessed() {
        let owner = Pubkey::default();
        let (signer, bystander) = (Pubkey::new_unique(), Pubkey::new_unique());
        let (mut l0, mut l1) = (0u64, 0u64);
        let (mut d0, mut d1) = ([0u8; 0], [0u8; 0]);
        let accounts = vec![
            info(&signer, true, &mut l0, &mut d0, &owner),
            info(&bystander, false, &mut l1, &mut d1, &owner),
        ];

        let witnesses = WitnessSet::collect(accounts.iter());
        assert!(witnesses.is_witnessed(&signer));
        assert!(!witnesses.is_witnessed(&bystander));
        assert_eq!(witnesses.len(), 1);
    }

    #[test]
    fn repeated_signer_counts_once() {
        let owner = Pubkey::default();
        let signer = Pubkey::new_unique();
        let (mut l0, mut l1) = (0u64, 0u64);
        let (mut d0, mut d1) = ([0u8; 0], [0u8; 0]);
        let accounts = vec![
            info(&signer, true, &mut l0, &mut d0, &owner),
            info(&signer, true, &mut l1, &mut d1, &owner),
        ];

        assert_eq!(WitnessSet::collect(accounts.iter()).len(), 1);
    }

    #[test]
    fn slices_act_as_witness_sets() {
        let signed = [Pubkey::new_unique()];
        assert!(signed[..].is_witnessed(&signed[0]));
        assert!(!signed[..].is_witnessed(&Pubkey::new_unique()));
    }
}
