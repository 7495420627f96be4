use actix_web::{HttpRequest, HttpResponse, Result as ActixResult};

use super::{EmailThreadService, load_thread};
use crate::models::email_threads::requests::LinkThreadRequest;
use crate::models::{ApiResponse, ErrorCode};
use crate::services::{check_references, storage_failure};
use crate::storage::Storage;

/// 缺省保持，0 清除，其余为新值
fn apply(current: Option<i64>, requested: Option<i64>) -> Option<i64> {
    match requested {
        None => current,
        Some(id) if id <= 0 => None,
        Some(id) => Some(id),
    }
}

/// 只校验新设置的退货、维修、工单
async fn check_extra_references(
    storage: &dyn Storage,
    link_data: &LinkThreadRequest,
) -> Result<(), HttpResponse> {
    let positive = |id: Option<i64>| id.filter(|id| *id > 0);

    if let Some(id) = positive(link_data.return_id) {
        match storage.get_return_by_id(id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(ApiResponse::bad_request(
                    ErrorCode::ReturnNotFound,
                    "Return not found",
                ));
            }
            Err(e) => return Err(storage_failure("Return lookup", &e)),
        }
    }
    if let Some(id) = positive(link_data.repair_id) {
        match storage.get_repair_by_id(id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(ApiResponse::bad_request(
                    ErrorCode::RepairNotFound,
                    "Repair not found",
                ));
            }
            Err(e) => return Err(storage_failure("Repair lookup", &e)),
        }
    }
    if let Some(id) = positive(link_data.case_id) {
        match storage.get_case_by_id(id).await {
            Ok(Some(_)) => {}
            Ok(None) => {
                return Err(ApiResponse::bad_request(ErrorCode::CaseNotFound, "Case not found"));
            }
            Err(e) => return Err(storage_failure("Case lookup", &e)),
        }
    }
    Ok(())
}

pub async fn link_thread(
    service: &EmailThreadService,
    request: &HttpRequest,
    thread_id: i64,
    link_data: LinkThreadRequest,
) -> ActixResult<HttpResponse> {
    let storage = service.get_storage(request)?;

    let thread = match load_thread(storage.as_ref(), thread_id).await {
        Ok(thread) => thread,
        Err(resp) => return Ok(resp),
    };

    if let Err(resp) = check_references(
        storage.as_ref(),
        link_data.order_id.filter(|id| *id > 0),
        link_data.customer_id.filter(|id| *id > 0),
        None,
    )
    .await
    {
        return Ok(resp);
    }
    if let Err(resp) = check_extra_references(storage.as_ref(), &link_data).await {
        return Ok(resp);
    }

    let mut links = thread.links();
    links.customer_id = apply(links.customer_id, link_data.customer_id);
    links.order_id = apply(links.order_id, link_data.order_id);
    links.return_id = apply(links.return_id, link_data.return_id);
    links.repair_id = apply(links.repair_id, link_data.repair_id);
    links.case_id = apply(links.case_id, link_data.case_id);

    match storage.set_thread_links(thread_id, &links).await {
        Ok(Some(thread)) => Ok(HttpResponse::Ok().json(ApiResponse::success(
            thread,
            "Email thread links updated",
        ))),
        Ok(None) => Ok(ApiResponse::not_found(
            ErrorCode::EmailThreadNotFound,
            "Email thread not found",
        )),
        Err(e) => Ok(storage_failure("Link email thread", &e)),
    }
}

#[cfg(test)]
mod tests {
    use super::apply;

    #[test]
    fn test_apply_link_value() {
        assert_eq!(apply(Some(3), None), Some(3));
        assert_eq!(apply(Some(3), Some(0)), None);
        assert_eq!(apply(None, Some(7)), Some(7));
        assert_eq!(apply(Some(3), Some(9)), Some(9));
    }
}
