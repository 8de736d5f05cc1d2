use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Serialize, Deserialize, Copy, Clone, Eq, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    Cash,
    Bank,
    Ewallet,
}

impl AccountType {
    pub const fn as_str(self) -> &'static str {
        match self {
            AccountType::Cash => "cash",
            AccountType::Bank => "bank",
            AccountType::Ewallet => "ewallet",
        }
    }
}

impl FromStr for AccountType {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "cash" => Ok(AccountType::Cash),
            "bank" => Ok(AccountType::Bank),
            "ewallet" => Ok(AccountType::Ewallet),
            other => Err(format!("unknown account type '{other}'")),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, Copy, Clone, Eq, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum ReceivableStatus {
    Active,
    PartiallyPaid,
    Paid,
}

impl ReceivableStatus {
    pub const fn as_str(self) -> &'static str {
        match self {
            ReceivableStatus::Active => "active",
            ReceivableStatus::PartiallyPaid => "partially_paid",
            ReceivableStatus::Paid => "paid",
        }
    }
}

impl FromStr for ReceivableStatus {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "active" => Ok(ReceivableStatus::Active),
            "partially_paid" => Ok(ReceivableStatus::PartiallyPaid),
            "paid" => Ok(ReceivableStatus::Paid),
            other => Err(format!("unknown receivable status '{other}'")),
        }
    }
}

impl fmt::Display for ReceivableStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub icon: String,
    pub color: String,
    pub initial_balance: Decimal,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateAccountRequest {
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub icon: String,
    pub color: String,
    pub initial_balance: Option<Decimal>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAccountRequest {
    pub id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub icon: String,
    pub color: String,
    pub initial_balance: Option<Decimal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalance {
    pub account_id: Uuid,
    pub name: String,
    #[serde(rename = "type")]
    pub account_type: AccountType,
    pub balance: Decimal,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountBalancesResponse {
    pub as_of: Option<NaiveDate>,
    pub accounts: Vec<AccountBalance>,
    pub total_balance: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub icon: String,
    pub color: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
    pub icon: String,
    pub color: String,
}

#[derive(Deserialize)]
pub struct UpdateCategoryRequest {
    pub id: Uuid,
    pub name: String,
    pub icon: String,
    pub color: String,
}

/// Where an income row came from. Mirrored receivable payments keep an explicit
/// link to the payment so the payment can be reversed without guessing.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum IncomeSource {
    Manual,
    #[serde(rename_all = "camelCase")]
    ReceivablePayment { payment_id: Uuid },
}

impl IncomeSource {
    pub fn payment_id(self) -> Option<Uuid> {
        match self {
            IncomeSource::Manual => None,
            IncomeSource::ReceivablePayment { payment_id } => Some(payment_id),
        }
    }
}

impl From<Option<Uuid>> for IncomeSource {
    fn from(payment_id: Option<Uuid>) -> Self {
        match payment_id {
            Some(payment_id) => IncomeSource::ReceivablePayment { payment_id },
            None => IncomeSource::Manual,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Income {
    pub id: Uuid,
    pub title: String,
    pub amount: Decimal,
    pub account_id: Uuid,
    pub date: NaiveDate,
    pub source: IncomeSource,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateIncomeRequest {
    pub title: String,
    pub amount: Decimal,
    pub account_id: Uuid,
    pub date: Option<NaiveDate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateIncomeRequest {
    pub id: Uuid,
    pub title: String,
    pub amount: Decimal,
    pub account_id: Uuid,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: Uuid,
    pub title: String,
    pub amount: Decimal,
    pub category_id: Uuid,
    pub account_id: Uuid,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpenseRequest {
    pub title: String,
    pub amount: Decimal,
    pub category_id: Uuid,
    pub account_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpenseRequest {
    pub id: Uuid,
    pub title: String,
    pub amount: Decimal,
    pub category_id: Uuid,
    pub account_id: Option<Uuid>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Transfer {
    pub id: Uuid,
    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    pub amount: Decimal,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTransferRequest {
    pub from_account_id: Uuid,
    pub to_account_id: Uuid,
    pub amount: Decimal,
    pub date: Option<NaiveDate>,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Adjustment {
    pub id: Uuid,
    pub account_id: Uuid,
    pub recorded_balance: Decimal,
    pub actual_balance: Decimal,
    pub difference: Decimal,
    pub note: Option<String>,
    pub date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileRequest {
    pub account_id: Uuid,
    pub actual_balance: Decimal,
    pub note: Option<String>,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustmentRemoval {
    pub message: String,
    pub adjustment: Adjustment,
    pub balance: Decimal,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InitialBalance {
    pub id: Uuid,
    pub amount: Decimal,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct InitialBalanceView {
    pub amount: Decimal,
    pub note: Option<String>,
}

#[derive(Deserialize)]
pub struct SetInitialBalanceRequest {
    pub amount: Decimal,
    pub note: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Receivable {
    pub id: Uuid,
    pub debtor_name: String,
    pub total_amount: Decimal,
    pub remaining: Decimal,
    pub description: Option<String>,
    pub date: NaiveDate,
    pub due_date: Option<NaiveDate>,
    pub status: ReceivableStatus,
    #[serde(skip)]
    pub version: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivableWithPayments {
    #[serde(flatten)]
    pub receivable: Receivable,
    pub payments: Vec<ReceivablePayment>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateReceivableRequest {
    pub debtor_name: String,
    pub total_amount: Decimal,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateReceivableRequest {
    pub id: Uuid,
    pub debtor_name: String,
    pub total_amount: Decimal,
    pub description: Option<String>,
    pub date: Option<NaiveDate>,
    pub due_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceivablePayment {
    pub id: Uuid,
    pub receivable_id: Uuid,
    pub amount: Decimal,
    pub account_id: Uuid,
    pub date: NaiveDate,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub receivable_id: Uuid,
    pub amount: Decimal,
    pub account_id: Uuid,
    pub date: Option<NaiveDate>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct PaymentReversal {
    pub message: String,
    pub receivable: Receivable,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Budget {
    pub id: Uuid,
    pub category_id: Uuid,
    pub amount: Decimal,
    pub month: i32,
    pub year: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpsertBudgetRequest {
    pub category_id: Uuid,
    pub amount: Decimal,
    pub month: i32,
    pub year: i32,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryStat {
    pub category_id: Uuid,
    pub category: String,
    pub icon: String,
    pub color: String,
    pub total: Decimal,
    pub count: i64,
    pub budget: Option<Decimal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub month: u32,
    pub year: i32,
    pub total_income: Decimal,
    pub total_expenses: Decimal,
    pub balance: Decimal,
    pub category_stats: Vec<CategoryStat>,
    pub account_balances: Vec<AccountBalance>,
    pub total_balance: Decimal,
    pub opening_balance: Decimal,
    pub cumulative_balance: Decimal,
    pub ytd_balance: Decimal,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}
