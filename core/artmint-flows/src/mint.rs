//! NFT mint flows: SOL-paid and token-paid
//!
//! Both paths upload the image, upload a metadata document referencing it and
//! then ask the issuer for a new NFT. The token-paid path first transfers the
//! configured price to a recipient and only mints once that transfer is
//! confirmed. There is no atomicity across the two phases.

use crate::burn::{positive_raw_amount, require_wallet, sign_and_send};
use crate::errors::{FlowError, FlowResult};
use crate::metrics;
use artmint_chain::{
    get_associated_token_address, token, Commitment, Connection, Pubkey, Signature, Wallet,
};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// Payment token amounts are always converted with 9 decimals
pub const PAYMENT_TOKEN_DECIMALS: u8 = 9;

/// Metaplex limits on on-chain name and symbol
pub const MAX_NAME_LEN: usize = 32;
pub const MAX_SYMBOL_LEN: usize = 10;
pub const MAX_BASIS_POINTS: u16 = 10_000;

/// File handed to decentralized storage
#[derive(Debug, Clone)]
pub struct StorageFile {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Content-addressed off-chain storage (Arweave, IPFS, ...)
#[async_trait]
pub trait MetadataStorage: Send + Sync {
    /// Upload raw bytes, returning their public URI
    async fn upload_file(&self, file: StorageFile) -> FlowResult<String>;

    /// Upload a JSON document, returning its public URI
    async fn upload_json(&self, document: &serde_json::Value) -> FlowResult<String>;
}

/// Creator entry recorded on the NFT
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creator {
    pub address: Pubkey,
    pub verified: bool,
    pub share: u8,
}

/// Everything the issuer needs to create the on-chain record
#[derive(Debug, Clone, PartialEq)]
pub struct NftMintArgs {
    pub name: String,
    pub symbol: String,
    pub uri: String,
    pub seller_fee_basis_points: u16,
    pub creators: Vec<Creator>,
    pub update_authority: Pubkey,
}

/// Creates non-fungible tokens (Metaplex or equivalent)
#[async_trait]
pub trait NftIssuer: Send + Sync {
    /// Returns the new NFT's mint address
    async fn create_nft(&self, args: NftMintArgs) -> FlowResult<Pubkey>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftAttribute {
    pub trait_type: String,
    pub value: String,
}

/// What the user wants minted
#[derive(Debug, Clone)]
pub struct MintRequest {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub image: Vec<u8>,
    pub image_content_type: String,
    pub attributes: Vec<NftAttribute>,
    pub seller_fee_basis_points: u16,
}

impl MintRequest {
    pub fn validate(&self) -> FlowResult<()> {
        if self.name.trim().is_empty() || self.name.chars().count() > MAX_NAME_LEN {
            return Err(FlowError::InvalidMetadata(format!(
                "name must be 1..={} characters",
                MAX_NAME_LEN
            )));
        }
        if self.symbol.chars().count() > MAX_SYMBOL_LEN {
            return Err(FlowError::InvalidMetadata(format!(
                "symbol must be at most {} characters",
                MAX_SYMBOL_LEN
            )));
        }
        if self.seller_fee_basis_points > MAX_BASIS_POINTS {
            return Err(FlowError::InvalidMetadata(format!(
                "royalty {} bps exceeds {}",
                self.seller_fee_basis_points, MAX_BASIS_POINTS
            )));
        }
        if self.image.is_empty() {
            return Err(FlowError::InvalidMetadata("image is empty".to_string()));
        }
        Ok(())
    }

    fn image_file_name(&self) -> String {
        let extension = match self.image_content_type.as_str() {
            "image/jpeg" => "jpg",
            "image/gif" => "gif",
            "image/webp" => "webp",
            _ => "png",
        };
        format!("image.{}", extension)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataFile {
    pub uri: String,
    #[serde(rename = "type")]
    pub content_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreatorShare {
    pub address: Pubkey,
    pub share: u8,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MetadataProperties {
    pub files: Vec<MetadataFile>,
    pub category: String,
    pub creators: Vec<CreatorShare>,
}

/// Off-chain JSON document in the Metaplex token standard layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NftMetadataDocument {
    pub name: String,
    pub symbol: String,
    pub description: String,
    pub image: String,
    pub attributes: Vec<NftAttribute>,
    pub seller_fee_basis_points: u16,
    pub properties: MetadataProperties,
}

impl NftMetadataDocument {
    pub fn new(request: &MintRequest, image_uri: &str, creator: &Pubkey) -> Self {
        Self {
            name: request.name.clone(),
            symbol: request.symbol.clone(),
            description: request.description.clone(),
            image: image_uri.to_string(),
            attributes: request.attributes.clone(),
            seller_fee_basis_points: request.seller_fee_basis_points,
            properties: MetadataProperties {
                files: vec![MetadataFile {
                    uri: image_uri.to_string(),
                    content_type: request.image_content_type.clone(),
                }],
                category: "image".to_string(),
                creators: vec![CreatorShare {
                    address: *creator,
                    share: 100,
                }],
            },
        }
    }
}

/// Outcome of a successful mint
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MintResult {
    pub mint_address: Pubkey,
    pub metadata_uri: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_signature: Option<Signature>,
}

/// Token payment terms for the token-paid path
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentConfig {
    pub payment_mint: Pubkey,
    pub recipient: Pubkey,
    /// Human units, converted with `PAYMENT_TOKEN_DECIMALS`
    pub price: f64,
}

/// Mint paid in SOL: network fees and rent come from the connected wallet
pub async fn mint_with_sol(
    wallet: &dyn Wallet,
    storage: &dyn MetadataStorage,
    issuer: &dyn NftIssuer,
    request: &MintRequest,
) -> FlowResult<MintResult> {
    let owner = require_wallet(wallet)?;
    let result = upload_and_mint(&owner, storage, issuer, request, None).await;
    metrics::record_flow("mint_sol", result.is_ok());
    result
}

/// Mint paid with a token transfer that must confirm first
pub async fn mint_with_token(
    wallet: &dyn Wallet,
    connection: &dyn Connection,
    storage: &dyn MetadataStorage,
    issuer: &dyn NftIssuer,
    payment: &PaymentConfig,
    request: &MintRequest,
) -> FlowResult<MintResult> {
    let result = pay_then_mint(wallet, connection, storage, issuer, payment, request).await;
    metrics::record_flow("mint_token", result.is_ok());
    result
}

async fn pay_then_mint(
    wallet: &dyn Wallet,
    connection: &dyn Connection,
    storage: &dyn MetadataStorage,
    issuer: &dyn NftIssuer,
    payment: &PaymentConfig,
    request: &MintRequest,
) -> FlowResult<MintResult> {
    let owner = require_wallet(wallet)?;
    request.validate()?;
    let price = positive_raw_amount(payment.price, PAYMENT_TOKEN_DECIMALS)?;

    let source = get_associated_token_address(&owner, &payment.payment_mint)?;
    let destination = get_associated_token_address(&payment.recipient, &payment.payment_mint)?;

    let balance = connection
        .get_token_account_balance(&source)
        .await?
        .ok_or_else(|| FlowError::AccountNotFound(source.to_string()))?;
    if balance.amount < price {
        return Err(FlowError::InsufficientBalance {
            have: balance.amount,
            need: price,
        });
    }

    let instruction = token::transfer(&source, &destination, &owner, price);
    let payment_signature = sign_and_send(connection, wallet, &owner, instruction).await?;
    debug!("Payment {} submitted, waiting for confirmation", payment_signature);

    if !connection
        .confirm_transaction(&payment_signature, Commitment::Confirmed)
        .await?
    {
        return Err(FlowError::PaymentNotConfirmed(payment_signature.to_string()));
    }
    info!("Payment {} confirmed, minting {}", payment_signature, request.name);

    upload_and_mint(&owner, storage, issuer, request, Some(payment_signature))
        .await
        .map_err(|e| {
            // Paid but not minted; nothing refunds the payment
            warn!("Mint failed after confirmed payment {}: {}", payment_signature, e);
            e
        })
}

async fn upload_and_mint(
    owner: &Pubkey,
    storage: &dyn MetadataStorage,
    issuer: &dyn NftIssuer,
    request: &MintRequest,
    payment_signature: Option<Signature>,
) -> FlowResult<MintResult> {
    request.validate()?;

    let image_uri = storage
        .upload_file(StorageFile {
            file_name: request.image_file_name(),
            content_type: request.image_content_type.clone(),
            bytes: request.image.clone(),
        })
        .await?;
    debug!("Uploaded image for {} to {}", request.name, image_uri);

    let document = NftMetadataDocument::new(request, &image_uri, owner);
    let metadata_uri = storage.upload_json(&serde_json::to_value(&document)?).await?;

    let mint_address = issuer
        .create_nft(NftMintArgs {
            name: request.name.clone(),
            symbol: request.symbol.clone(),
            uri: metadata_uri.clone(),
            seller_fee_basis_points: request.seller_fee_basis_points,
            creators: vec![Creator {
                address: *owner,
                verified: true,
                share: 100,
            }],
            update_authority: *owner,
        })
        .await?;

    info!("Minted {} as {} ({})", request.name, mint_address, metadata_uri);
    Ok(MintResult {
        mint_address,
        metadata_uri,
        name: request.name.clone(),
        payment_signature,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> MintRequest {
        MintRequest {
            name: "Sunset #1".to_string(),
            symbol: "SUN".to_string(),
            description: "Generated sunset".to_string(),
            image: vec![0x89, b'P', b'N', b'G'],
            image_content_type: "image/png".to_string(),
            attributes: vec![NftAttribute {
                trait_type: "style".to_string(),
                value: "watercolor".to_string(),
            }],
            seller_fee_basis_points: 500,
        }
    }

    #[test]
    fn test_validation_limits() {
        assert!(request().validate().is_ok());

        let mut long_name = request();
        long_name.name = "x".repeat(MAX_NAME_LEN + 1);
        assert!(matches!(long_name.validate(), Err(FlowError::InvalidMetadata(_))));

        let mut royalty = request();
        royalty.seller_fee_basis_points = 10_001;
        assert!(royalty.validate().is_err());

        let mut empty = request();
        empty.image.clear();
        assert!(empty.validate().is_err());
    }

    #[test]
    fn test_metadata_document_layout() {
        let creator = Pubkey::new([4u8; 32]);
        let doc = NftMetadataDocument::new(&request(), "https://arweave.net/img", &creator);
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["image"], "https://arweave.net/img");
        assert_eq!(json["seller_fee_basis_points"], 500);
        assert_eq!(json["attributes"][0]["trait_type"], "style");
        assert_eq!(json["properties"]["files"][0]["type"], "image/png");
        assert_eq!(json["properties"]["creators"][0]["address"], creator.to_string());
        assert_eq!(json["properties"]["creators"][0]["share"], 100);
    }

    #[test]
    fn test_image_file_name() {
        let mut req = request();
        assert_eq!(req.image_file_name(), "image.png");
        req.image_content_type = "image/jpeg".to_string();
        assert_eq!(req.image_file_name(), "image.jpg");
    }
}
