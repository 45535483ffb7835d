pub mod gateway;
pub mod razorpay;
pub mod reconciliation;

pub use gateway::{PaymentGateway, SandboxGateway};
pub use razorpay::RazorpayGateway;
pub use reconciliation::PaymentService;
