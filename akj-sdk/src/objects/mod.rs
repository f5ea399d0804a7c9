pub mod order_id;
pub mod payment_link;
pub mod verify;

pub use order_id::OrderId;
pub use payment_link::{CreatePaymentLinkRequest, CustomerDetails, LinkShapeError, PaymentLink, PaymentLinkResponse};
pub use verify::{VerificationStatus, VerifyPaymentResponse};
