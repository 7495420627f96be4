//! 预导入模块，方便使用

pub use super::attachments::{
    ActiveModel as AttachmentActiveModel, Entity as Attachments, Model as AttachmentModel,
};
pub use super::cases::{ActiveModel as CaseActiveModel, Entity as Cases, Model as CaseModel};
pub use super::customers::{
    ActiveModel as CustomerActiveModel, Entity as Customers, Model as CustomerModel,
};
pub use super::email_messages::{
    ActiveModel as EmailMessageActiveModel, Entity as EmailMessages, Model as EmailMessageModel,
};
pub use super::email_threads::{
    ActiveModel as EmailThreadActiveModel, Entity as EmailThreads, Model as EmailThreadModel,
};
pub use super::notes::{ActiveModel as NoteActiveModel, Entity as Notes, Model as NoteModel};
pub use super::orders::{ActiveModel as OrderActiveModel, Entity as Orders, Model as OrderModel};
pub use super::purchase_orders::{
    ActiveModel as PurchaseOrderActiveModel, Entity as PurchaseOrders,
    Model as PurchaseOrderModel,
};
pub use super::repairs::{
    ActiveModel as RepairActiveModel, Entity as Repairs, Model as RepairModel,
};
pub use super::returns::{
    ActiveModel as ReturnActiveModel, Entity as Returns, Model as ReturnModel,
};
pub use super::sync_states::{
    ActiveModel as SyncStateActiveModel, Entity as SyncStates, Model as SyncStateModel,
};
pub use super::todos::{ActiveModel as TodoActiveModel, Entity as Todos, Model as TodoModel};
pub use super::users::{ActiveModel as UserActiveModel, Entity as Users, Model as UserModel};
