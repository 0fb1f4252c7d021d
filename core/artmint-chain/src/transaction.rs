//! Legacy Solana message and transaction encoding

use crate::errors::{ChainError, ChainResult};
use crate::pubkey::{Hash, Pubkey, Signature};
use base64::{engine::general_purpose::STANDARD, Engine as _};

/// Account reference inside an instruction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountMeta {
    pub pubkey: Pubkey,
    pub is_signer: bool,
    pub is_writable: bool,
}

impl AccountMeta {
    /// Writable account
    pub fn new(pubkey: Pubkey, is_signer: bool) -> Self {
        Self { pubkey, is_signer, is_writable: true }
    }

    /// Read-only account
    pub fn new_readonly(pubkey: Pubkey, is_signer: bool) -> Self {
        Self { pubkey, is_signer, is_writable: false }
    }
}

/// Program invocation before compilation into a message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub program_id: Pubkey,
    pub accounts: Vec<AccountMeta>,
    pub data: Vec<u8>,
}

/// Instruction with accounts replaced by indices into the message key list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CompiledInstruction {
    pub program_id_index: u8,
    pub accounts: Vec<u8>,
    pub data: Vec<u8>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MessageHeader {
    pub num_required_signatures: u8,
    pub num_readonly_signed_accounts: u8,
    pub num_readonly_unsigned_accounts: u8,
}

/// Legacy (version-less) message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub header: MessageHeader,
    pub account_keys: Vec<Pubkey>,
    pub recent_blockhash: Hash,
    pub instructions: Vec<CompiledInstruction>,
}

impl Message {
    /// Compile instructions with `payer` as the first signer and fee payer
    pub fn new(instructions: &[Instruction], payer: &Pubkey, recent_blockhash: Hash) -> ChainResult<Self> {
        let mut metas: Vec<AccountMeta> = vec![AccountMeta::new(*payer, true)];
        for ix in instructions {
            for meta in &ix.accounts {
                merge_meta(&mut metas, meta);
            }
            merge_meta(&mut metas, &AccountMeta::new_readonly(ix.program_id, false));
        }

        // Stable sort keeps the payer at index 0
        metas.sort_by_key(|m| (!m.is_signer, !m.is_writable));

        if metas.len() > u8::MAX as usize + 1 {
            return Err(ChainError::TooManyAccounts(metas.len()));
        }

        let header = MessageHeader {
            num_required_signatures: metas.iter().filter(|m| m.is_signer).count() as u8,
            num_readonly_signed_accounts: metas.iter().filter(|m| m.is_signer && !m.is_writable).count() as u8,
            num_readonly_unsigned_accounts: metas.iter().filter(|m| !m.is_signer && !m.is_writable).count() as u8,
        };
        let account_keys: Vec<Pubkey> = metas.into_iter().map(|m| m.pubkey).collect();

        let index_of = |key: &Pubkey| -> u8 {
            // Every key was merged above, so the lookup cannot miss
            account_keys.iter().position(|k| k == key).unwrap_or_default() as u8
        };

        let compiled = instructions
            .iter()
            .map(|ix| CompiledInstruction {
                program_id_index: index_of(&ix.program_id),
                accounts: ix.accounts.iter().map(|m| index_of(&m.pubkey)).collect(),
                data: ix.data.clone(),
            })
            .collect();

        Ok(Self {
            header,
            account_keys,
            recent_blockhash,
            instructions: compiled,
        })
    }

    /// Keys that must sign, in signature-slot order
    pub fn signer_keys(&self) -> &[Pubkey] {
        &self.account_keys[..self.header.num_required_signatures as usize]
    }

    /// Wire encoding of the message (the bytes that get signed)
    pub fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(256);
        buf.push(self.header.num_required_signatures);
        buf.push(self.header.num_readonly_signed_accounts);
        buf.push(self.header.num_readonly_unsigned_accounts);

        encode_length(&mut buf, self.account_keys.len());
        for key in &self.account_keys {
            buf.extend_from_slice(key.as_ref());
        }

        buf.extend_from_slice(self.recent_blockhash.as_ref());

        encode_length(&mut buf, self.instructions.len());
        for ix in &self.instructions {
            buf.push(ix.program_id_index);
            encode_length(&mut buf, ix.accounts.len());
            buf.extend_from_slice(&ix.accounts);
            encode_length(&mut buf, ix.data.len());
            buf.extend_from_slice(&ix.data);
        }
        buf
    }
}

fn merge_meta(metas: &mut Vec<AccountMeta>, meta: &AccountMeta) {
    match metas.iter_mut().find(|m| m.pubkey == meta.pubkey) {
        Some(existing) => {
            existing.is_signer |= meta.is_signer;
            existing.is_writable |= meta.is_writable;
        }
        None => metas.push(meta.clone()),
    }
}

/// Compact-u16 length prefix used throughout the wire format
pub fn encode_length(buf: &mut Vec<u8>, len: usize) {
    let mut rem = len;
    loop {
        let mut elem = (rem & 0x7f) as u8;
        rem >>= 7;
        if rem == 0 {
            buf.push(elem);
            break;
        }
        elem |= 0x80;
        buf.push(elem);
    }
}

/// Signed or partially signed transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transaction {
    pub signatures: Vec<Signature>,
    pub message: Message,
}

impl Transaction {
    /// Transaction with one empty signature slot per required signer
    pub fn new_unsigned(message: Message) -> Self {
        let slots = message.header.num_required_signatures as usize;
        Self {
            signatures: vec![Signature::default(); slots],
            message,
        }
    }

    /// Bytes a signer signs
    pub fn message_data(&self) -> Vec<u8> {
        self.message.serialize()
    }

    /// Place `signature` in the slot belonging to `signer`
    pub fn add_signature(&mut self, signer: &Pubkey, signature: Signature) -> ChainResult<()> {
        let slot = self
            .message
            .signer_keys()
            .iter()
            .position(|k| k == signer)
            .ok_or_else(|| ChainError::NotASigner(signer.to_string()))?;
        self.signatures[slot] = signature;
        Ok(())
    }

    pub fn is_signed(&self) -> bool {
        !self.signatures.is_empty() && self.signatures.iter().all(|s| *s != Signature::default())
    }

    /// Transaction id: the fee payer's signature
    pub fn signature(&self) -> Option<&Signature> {
        self.signatures.first()
    }

    /// Wire encoding: signatures followed by the message
    pub fn serialize(&self) -> Vec<u8> {
        let message = self.message.serialize();
        let mut buf = Vec::with_capacity(1 + self.signatures.len() * Signature::LEN + message.len());
        encode_length(&mut buf, self.signatures.len());
        for sig in &self.signatures {
            buf.extend_from_slice(sig.as_ref());
        }
        buf.extend_from_slice(&message);
        buf
    }

    /// Base64 wire form accepted by `sendTransaction`
    pub fn to_base64(&self) -> ChainResult<String> {
        if !self.is_signed() {
            return Err(ChainError::UnsignedTransaction);
        }
        Ok(STANDARD.encode(self.serialize()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(b: u8) -> Pubkey {
        Pubkey::new([b; 32])
    }

    #[test]
    fn test_compact_length_encoding() {
        let cases: [(usize, &[u8]); 5] = [
            (0, &[0x00]),
            (127, &[0x7f]),
            (128, &[0x80, 0x01]),
            (16383, &[0xff, 0x7f]),
            (16384, &[0x80, 0x80, 0x01]),
        ];
        for (len, expected) in cases {
            let mut buf = Vec::new();
            encode_length(&mut buf, len);
            assert_eq!(buf, expected, "length {}", len);
        }
    }

    #[test]
    fn test_message_account_ordering() {
        let payer = key(1);
        let writable = key(2);
        let readonly = key(3);
        let program = key(4);
        let ix = Instruction {
            program_id: program,
            accounts: vec![
                AccountMeta::new_readonly(readonly, false),
                AccountMeta::new(writable, false),
                AccountMeta::new_readonly(payer, true),
            ],
            data: vec![7],
        };

        let message = Message::new(&[ix], &payer, Hash::default()).unwrap();
        assert_eq!(message.account_keys, vec![payer, writable, readonly, program]);
        assert_eq!(message.header.num_required_signatures, 1);
        assert_eq!(message.header.num_readonly_signed_accounts, 0);
        assert_eq!(message.header.num_readonly_unsigned_accounts, 2);
        assert_eq!(message.instructions[0].program_id_index, 3);
        assert_eq!(message.instructions[0].accounts, vec![2, 1, 0]);
    }

    #[test]
    fn test_message_serialization_layout() {
        let payer = key(1);
        let program = key(4);
        let ix = Instruction {
            program_id: program,
            accounts: vec![AccountMeta::new(payer, true)],
            data: vec![8, 1, 0, 0, 0, 0, 0, 0, 0],
        };
        let blockhash = Hash::new([5u8; 32]);
        let bytes = Message::new(&[ix], &payer, blockhash).unwrap().serialize();

        assert_eq!(&bytes[..3], &[1, 0, 1]);
        assert_eq!(bytes[3], 2); // two keys
        assert_eq!(&bytes[4..36], payer.as_ref());
        assert_eq!(&bytes[36..68], program.as_ref());
        assert_eq!(&bytes[68..100], blockhash.as_ref());
        assert_eq!(bytes[100], 1); // one instruction
        assert_eq!(&bytes[101..104], &[1, 1, 0]);
        assert_eq!(bytes[104], 9);
        assert_eq!(bytes.len(), 105 + 9);
    }

    #[test]
    fn test_unsigned_transaction_cannot_be_encoded() {
        let payer = key(1);
        let message = Message::new(&[], &payer, Hash::default()).unwrap();
        let tx = Transaction::new_unsigned(message);
        assert_eq!(tx.signatures.len(), 1);
        assert!(!tx.is_signed());
        assert!(matches!(tx.to_base64(), Err(ChainError::UnsignedTransaction)));
    }

    #[test]
    fn test_add_signature_rejects_non_signer() {
        let payer = key(1);
        let message = Message::new(&[], &payer, Hash::default()).unwrap();
        let mut tx = Transaction::new_unsigned(message);
        let err = tx.add_signature(&key(9), Signature::new([1u8; 64])).unwrap_err();
        assert!(matches!(err, ChainError::NotASigner(_)));

        tx.add_signature(&payer, Signature::new([1u8; 64])).unwrap();
        assert!(tx.is_signed());
        let wire = tx.serialize();
        assert_eq!(wire[0], 1);
        assert_eq!(&wire[1..65], &[1u8; 64]);
    }
}
