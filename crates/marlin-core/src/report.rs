//! # Ledger Report Aggregator
//!
//! Pure fold over a period's transactions and expenses. The caller decides
//! what the period is (today, a month, everything) by choosing which slices
//! to pass in; nothing here touches storage or clocks.

use serde::Serialize;

use crate::money::Money;
use crate::types::{Expense, PaymentMethod, Transaction, TransactionKind};

/// Aggregated financial totals for one reporting period.
///
/// `collected` is always the sum of its three per-method parts, and
/// `cash_balance` is always `collected - expenses`. Both hold even when
/// sales are partially paid, because every figure is computed from the same
/// payment records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReportTotals {
    /// Sum of sale totals (full invoiced amounts, paid or not).
    pub sales: Money,
    /// Sum of expense amounts.
    pub expenses: Money,
    /// Sum of all payment records on sales in the period.
    pub collected: Money,
    pub collected_cash: Money,
    pub collected_wallet: Money,
    pub collected_credit: Money,
    /// Sum of outstanding debt across the period's sales.
    pub debt: Money,
    /// `collected - expenses`. May be negative.
    pub cash_balance: Money,
}

/// Folds a period's transactions and expenses into [`ReportTotals`].
///
/// Sale totals and payment records are read from sale-kind transactions
/// only; collection transactions exist as an audit trail of *when* debt was
/// recovered, and counting their payment records too would double-count
/// money already appended to the originating sale.
pub fn report(transactions: &[Transaction], expenses: &[Expense]) -> ReportTotals {
    let mut sales = Money::zero();
    let mut debt = Money::zero();
    let mut collected_cash = Money::zero();
    let mut collected_wallet = Money::zero();
    let mut collected_credit = Money::zero();

    for tx in transactions {
        if tx.kind != TransactionKind::Sale {
            continue;
        }
        sales += tx.total;
        debt += tx.outstanding_debt();
        for payment in &tx.payments {
            match payment.method {
                PaymentMethod::Cash => collected_cash += payment.amount,
                PaymentMethod::MobileWallet => collected_wallet += payment.amount,
                PaymentMethod::Credit => collected_credit += payment.amount,
            }
        }
    }

    let expense_total: Money = expenses.iter().map(|e| &e.amount).sum();
    let collected = collected_cash + collected_wallet + collected_credit;

    ReportTotals {
        sales,
        expenses: expense_total,
        collected,
        collected_cash,
        collected_wallet,
        collected_credit,
        debt,
        cash_balance: collected - expense_total,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
