//! # Domain Entities
//!
//! Plans and subscriptions as read back from contract storage, and the
//! request shape for creating a plan.

use serde::{Deserialize, Serialize};
use shared_types::{Address, Hash, U256};
use vs_01_log_decoding::{AbiError, DynSolValue};

use super::metadata::{
    bytes32_to_identifier, parse_display_fields, saturating_u64, seconds_to_days, Metadata,
};

/// A recurring payment plan.
///
/// Reading an unknown key yields an all-zero plan; see [`Plan::is_empty`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    /// Contract-assigned key the plan was read with.
    pub plan_hash: Hash,
    /// Plan owner.
    pub owner: Address,
    /// Token the plan is paid in.
    pub token_address: Address,
    /// Caller-chosen identifier.
    pub identifier: String,
    /// Billing interval in whole days.
    pub interval: u64,
    /// Amount charged per interval.
    pub amount: U256,
    /// Fee charged per interval.
    pub fee: U256,
    /// Raw metadata text.
    pub data: String,
    /// Display name parsed from `data`.
    pub name: Option<String>,
    /// Description parsed from `data`.
    pub description: Option<String>,
    /// Image URL parsed from `data`.
    pub image_url: Option<String>,
    /// Seconds since epoch; 0 while the plan is active.
    pub termination_date: u64,
}

impl Plan {
    /// Builds a plan from the outputs of `plans(bytes32)`:
    /// `(owner, tokenAddress, identifier, interval, amount, fee, data, terminationDate)`.
    pub fn from_storage(plan_hash: Hash, values: &[DynSolValue]) -> Result<Self, AbiError> {
        let fields = StorageFields::new("plans", values, 8)?;
        let data = fields.text(6)?;
        let display = parse_display_fields(&data);

        Ok(Self {
            plan_hash,
            owner: fields.address(0)?,
            token_address: fields.address(1)?,
            identifier: bytes32_to_identifier(fields.bytes(2)?),
            interval: seconds_to_days(fields.uint(3)?),
            amount: fields.uint(4)?,
            fee: fields.uint(5)?,
            data,
            name: display.name,
            description: display.description,
            image_url: display.image_url,
            termination_date: saturating_u64(fields.uint(7)?),
        })
    }

    /// Whether storage returned the zero record (no such plan).
    pub fn is_empty(&self) -> bool {
        self.owner.is_zero()
    }

    /// Whether the plan has been terminated.
    pub fn is_terminated(&self) -> bool {
        self.termination_date != 0
    }
}

/// One user's subscription to a plan.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subscription {
    /// Contract-assigned key the subscription was read with.
    pub identifier: Hash,
    /// Subscriber.
    pub owner: Address,
    /// Token payments are made in.
    pub token_address: Address,
    /// Key of the subscribed plan (not resolved).
    pub plan_hash: Hash,
    /// Seconds since epoch of the last processed payment.
    pub last_payment_date: u64,
    /// Seconds since epoch; 0 while the subscription is active.
    pub termination_date: u64,
    /// Raw metadata text.
    pub data: String,
}

impl Subscription {
    /// Builds a subscription from the outputs of `subscriptions(bytes32)`:
    /// `(owner, tokenAddress, planHash, lastPaymentDate, terminationDate, data)`.
    pub fn from_storage(identifier: Hash, values: &[DynSolValue]) -> Result<Self, AbiError> {
        let fields = StorageFields::new("subscriptions", values, 6)?;
        Ok(Self {
            identifier,
            owner: fields.address(0)?,
            token_address: fields.address(1)?,
            plan_hash: Hash::from_slice(fields.bytes(2)?),
            last_payment_date: saturating_u64(fields.uint(3)?),
            termination_date: saturating_u64(fields.uint(4)?),
            data: fields.text(5)?,
        })
    }

    /// Whether storage returned the zero record (no such subscription).
    pub fn is_empty(&self) -> bool {
        self.owner.is_zero()
    }

    /// Whether the subscription has been cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.termination_date != 0
    }
}

/// Typed positional access to a storage tuple.
struct StorageFields<'a> {
    getter: &'static str,
    values: &'a [DynSolValue],
}

impl<'a> StorageFields<'a> {
    fn new(getter: &'static str, values: &'a [DynSolValue], arity: usize) -> Result<Self, AbiError> {
        if values.len() != arity {
            return Err(AbiError::ArityMismatch {
                expected: arity,
                got: values.len(),
            });
        }
        Ok(Self { getter, values })
    }

    fn mismatch(&self, index: usize, expected: &str) -> AbiError {
        AbiError::TypeMismatch(format!("{}[{}] is not {}", self.getter, index, expected))
    }

    fn address(&self, index: usize) -> Result<Address, AbiError> {
        self.values[index]
            .as_address()
            .ok_or_else(|| self.mismatch(index, "an address"))
    }

    fn uint(&self, index: usize) -> Result<U256, AbiError> {
        self.values[index]
            .as_uint()
            .map(|(value, _)| value)
            .ok_or_else(|| self.mismatch(index, "an unsigned integer"))
    }

    fn bytes(&self, index: usize) -> Result<&'a [u8], AbiError> {
        match &self.values[index] {
            DynSolValue::FixedBytes(word, 32) => Ok(word.as_slice()),
            _ => Err(self.mismatch(index, "bytes32")),
        }
    }

    fn text(&self, index: usize) -> Result<String, AbiError> {
        self.values[index]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| self.mismatch(index, "a string"))
    }
}

/// Parameters of a new plan.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CreatePlanRequest {
    /// Plan owner.
    pub owner: Address,
    /// Token the plan is paid in.
    pub token_address: Address,
    /// Caller-chosen identifier, at most 32 bytes of UTF-8.
    pub identifier: String,
    /// Billing interval in days.
    pub interval_days: u64,
    /// Amount charged per interval.
    pub amount: U256,
    /// Fee charged per interval.
    pub fee: U256,
    /// Display name; when set, the display keys overwrite `metadata`.
    pub name: Option<String>,
    /// Description, written alongside `name`.
    pub description: Option<String>,
    /// Image URL, written alongside `name`.
    pub image_url: Option<String>,
    /// Free-form metadata.
    pub metadata: Option<Metadata>,
}

impl CreatePlanRequest {
    /// Request with the required economic fields and no metadata.
    pub fn new(
        owner: Address,
        token_address: Address,
        identifier: impl Into<String>,
        interval_days: u64,
        amount: U256,
        fee: U256,
    ) -> Self {
        Self {
            owner,
            token_address,
            identifier: identifier.into(),
            interval_days,
            amount,
            fee,
            ..Default::default()
        }
    }

    /// Attach display fields.
    #[must_use]
    pub fn with_display(
        mut self,
        name: impl Into<String>,
        description: Option<String>,
        image_url: Option<String>,
    ) -> Self {
        self.name = Some(name.into());
        self.description = description;
        self.image_url = image_url;
        self
    }

    /// Attach free-form metadata.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }
}
