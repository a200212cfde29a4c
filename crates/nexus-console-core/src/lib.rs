pub mod balance;
pub mod bridge;
pub mod domain;
pub mod hooks;
pub mod ports;
pub mod session;
pub mod state_machine;
pub mod transfer;
pub mod wallet;

pub use balance::BalanceViewer;
pub use bridge::{BridgeForm, BridgePanel, HookActivity};
pub use domain::{
    chain_display_name, format_fiat, format_token_amount, parse_decimal_amount,
    truncate_address, unified_total_fiat, AmountError, BalanceAsset, BridgeParams, ChainInfo,
    SupportedChain, Token, TokenBreakdown, TransferParams,
};
pub use hooks::{
    approve_minimum_allowance, AllowanceChoice, AllowanceHook, AllowanceRequest,
    AllowanceResponse, IntentDecision, IntentHook, IntentInbox, IntentRequest, Responder,
};
pub use ports::{ChainIdPort, NexusSdkPort, PortError, ProviderPort};
pub use session::{initialize_session, teardown_session, SessionError, SessionHolder};
pub use state_machine::{
    request_transition, session_transition, RequestAction, RequestSlot, RequestStatus,
    SessionAction, SessionStatus, StateTransition, TransitionError,
};
pub use transfer::{TransferForm, TransferPanel};
pub use wallet::WalletConnector;
