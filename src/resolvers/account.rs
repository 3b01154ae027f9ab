use super::{coins, found};
use crate::api_client::{get, RemoteDataClient};
use crate::error::Result;
use crate::identifier::AccountRef;
use crate::models::{ContractLanguage, ContractView, Fee, TransactionPreview, UserAccountView};
use crate::routes::ApiRoute;
use crate::types::{Account, TransactionWithTxHash};
use crate::util_text::format_ordinal;

fn account_route(account: &AccountRef) -> ApiRoute {
    ApiRoute::Account {
        shard: account.shard.as_str().to_string(),
        account_id: account.id.clone(),
    }
}

/// The account as a tagged `{eoa | contract}` variant.
pub async fn fetch_account_by_id(client: &dyn RemoteDataClient, account: &AccountRef) -> Result<Account> {
    log::info!("[account] resolving {}:{}", account.shard, account.id);
    get(client, &account_route(account))
        .await
        .map_err(|e| e.in_aggregate(format!("account \"{}:{}\"", account.shard, account.id)))
}

/// EOA page model; `None` when the account is missing or is a contract.
pub async fn fetch_user_account(
    client: &dyn RemoteDataClient,
    account: &AccountRef,
) -> Result<Option<UserAccountView>> {
    match found(fetch_account_by_id(client, account).await)? {
        Some(Account::Eoa(eoa)) => Ok(Some(UserAccountView {
            shard: account.shard.as_str().to_string(),
            account_id: account.id.clone(),
            balance: coins(&eoa.balance)?,
            nonce: eoa.nonce,
            gas: eoa.gas,
            pqc_pub: eoa.pqc_pub,
            rev_t: eoa.rev_t,
        })),
        Some(Account::Contract(_)) => {
            log::warn!("[account] {} is a contract, not an EOA", account.id);
            Ok(None)
        }
        None => Ok(None),
    }
}

/// Contract page model; `None` when the account is missing or is an EOA.
pub async fn fetch_contract(
    client: &dyn RemoteDataClient,
    contract: &AccountRef,
) -> Result<Option<ContractView>> {
    match found(fetch_account_by_id(client, contract).await)? {
        Some(Account::Contract(c)) => {
            let is_system = contract.shard.is_system();
            Ok(Some(ContractView {
                shard: contract.shard.as_str().to_string(),
                contract_id: contract.id.clone(),
                is_system,
                language: ContractLanguage::from_lang(&c.lang),
                lang: c.lang,
                balance: coins(&c.balance)?,
                gas: c.gas,
                storages: if is_system { Vec::new() } else { c.storages },
                storage_abstraction_last_payment: c.storage_abstraction_last_payment,
                last_payment_label: format!(
                    "{} epoch",
                    format_ordinal(c.storage_abstraction_last_payment)
                ),
            }))
        }
        Some(Account::Eoa(_)) => {
            log::warn!("[account] {} is an EOA, not a contract", contract.id);
            Ok(None)
        }
        None => Ok(None),
    }
}

/// Latest transactions of an account, newest first.
pub async fn fetch_account_transactions(
    client: &dyn RemoteDataClient,
    account: &AccountRef,
) -> Result<Vec<TransactionPreview>> {
    let route = ApiRoute::AccountTransactions {
        shard: account.shard.as_str().to_string(),
        account_id: account.id.clone(),
    };
    let txs: Vec<TransactionWithTxHash> = get(client, &route)
        .await
        .map_err(|e| e.in_aggregate(format!("transactions of \"{}\"", account.id)))?;

    Ok(txs.into_iter().rev().map(preview).collect())
}

/// Preview row. Only the priority fee is known without the receipt.
pub(crate) fn preview(tx: TransactionWithTxHash) -> TransactionPreview {
    TransactionPreview {
        txid: tx.tx_hash,
        tx_type: tx.tx.tx_type.as_str().to_string(),
        sig_type: tx.tx.sig_type,
        priority_fee: Fee::from_option(tx.tx.fee),
        total_fee: Fee::NotAvailable,
        creator: Some(tx.tx.creator),
    }
}
