//! Gateway payments: order creation and verified-callback finalization

use std::collections::HashMap;

use chrono::{DateTime, NaiveDate, Utc};
use shared::error::{AppError, ErrorCode};
use shared::models::{
    BookingRequest, CreateOrderResponse, MealEntryDraft, MealType, PaymentMethod, PaymentOrder,
    PaymentOrderStatus, PaymentVerification, VerificationOutcome,
};

use crate::booking::{BatchPlan, plan_batch, to_minor_units, validate_drafts};
use crate::db::{meal_entries, payment_orders, payments, user_points};
use crate::error::ServiceResult;
use crate::razorpay::RazorpayOrder;
use crate::services::booking::{insert_entries, plan_booking, spend_points};
use crate::state::AppState;
use crate::util::generate_receipt;

pub const CURRENCY: &str = "INR";

/// Create a gateway order for the unpaid remainder of a booking
pub async fn create_order(
    state: &AppState,
    request: BookingRequest,
    now: DateTime<Utc>,
) -> ServiceResult<CreateOrderResponse> {
    let plan = plan_booking(state, &request, now).await?;
    if plan.payable() <= 0 {
        return Err(
            AppError::invalid_request("Booking is fully covered by points, no payment needed")
                .into(),
        );
    }

    let receipt = generate_receipt();
    let order = state
        .razorpay
        .create_order(to_minor_units(plan.payable()), CURRENCY, &receipt)
        .await
        .map_err(|e| {
            tracing::error!(employee_id = %plan.employee_id, error = %e, "Razorpay order error");
            AppError::new(ErrorCode::PaymentGatewayError)
        })?;

    record_order(state, &plan, &order, &receipt, now).await
}

/// Persist a gateway order and the priced dates it pays for
///
/// Finalization books only these dates, at the stored amount.
pub async fn record_order(
    state: &AppState,
    plan: &BatchPlan,
    order: &RazorpayOrder,
    receipt: &str,
    now: DateTime<Utc>,
) -> ServiceResult<CreateOrderResponse> {
    let stored = PaymentOrder {
        order_id: order.id.clone(),
        employee_id: plan.employee_id.clone(),
        amount: order.amount,
        currency: order.currency.clone(),
        receipt: receipt.to_string(),
        points_redeemed: plan.points_redeemed,
        status: PaymentOrderStatus::Created,
        created_at: now.timestamp_millis(),
    };
    let quote = plan.quote();

    let mut tx = state.pool.begin().await?;
    payment_orders::insert(&mut *tx, &stored).await?;
    payment_orders::insert_entries(&mut *tx, &stored.order_id, &quote.entries).await?;
    tx.commit().await?;

    tracing::info!(
        order_id = %stored.order_id,
        employee_id = %stored.employee_id,
        amount = stored.amount,
        points = stored.points_redeemed,
        "Payment order created"
    );
    Ok(CreateOrderResponse {
        order_id: stored.order_id,
        amount: stored.amount,
        currency: stored.currency,
        key: state.razorpay.key_id().to_string(),
        quote,
    })
}

/// Verify a checkout callback and finalize the booking
///
/// The signature is checked before anything is read or written. Only dates
/// stored with the order are booked, with the stored meal type; other
/// drafts in the callback are ignored. A verified callback records the
/// payment, spends the order's points and creates the entries in one
/// transaction. Replays of the same payment change nothing.
pub async fn verify_payment(
    state: &AppState,
    verification: PaymentVerification,
    now: DateTime<Utc>,
) -> ServiceResult<VerificationOutcome> {
    let order_id = verification.razorpay_order_id.trim();
    let payment_id = verification.razorpay_payment_id.trim();

    if let Err(reason) = state.razorpay.verify_payment_signature(
        order_id,
        payment_id,
        &verification.razorpay_signature,
    ) {
        tracing::warn!(
            order_id = %order_id,
            payment_id = %payment_id,
            reason = %reason,
            "Payment signature rejected"
        );
        return Err(AppError::new(ErrorCode::PaymentSignatureMismatch).into());
    }

    let order = payment_orders::find(&state.pool, order_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::PaymentOrderNotFound).with_detail("orderId", order_id)
        })?;

    let (employee_id, dates) = validate_drafts(&verification.entries)?;
    if employee_id != order.employee_id {
        return Err(AppError::validation("Entries do not belong to the paying employee")
            .with_detail("orderId", order_id)
            .into());
    }

    let ordered: HashMap<String, MealType> =
        payment_orders::list_entries(&state.pool, order_id)
            .await?
            .into_iter()
            .map(|e| (e.date, e.meal_type))
            .collect();
    let paid_for: Vec<(MealEntryDraft, NaiveDate)> = verification
        .entries
        .into_iter()
        .zip(dates)
        .filter_map(|(mut draft, date)| {
            let meal_type = *ordered.get(&date.to_string())?;
            draft.meal_type = meal_type;
            Some((draft, date))
        })
        .collect();
    if paid_for.is_empty() {
        return Err(AppError::validation("Entries do not match the paid order")
            .with_detail("orderId", order_id)
            .into());
    }

    let now_ms = now.timestamp_millis();
    let payment_date = state.window.today(now).to_string();

    let mut tx = state.pool.begin().await?;

    let recorded = payments::insert_if_absent(
        &mut *tx,
        &payments::NewPayment {
            date: &payment_date,
            employee_id: &employee_id,
            razorpay_order_id: order_id,
            razorpay_payment_id: payment_id,
            razorpay_signature: verification.razorpay_signature.trim(),
            amount: order.amount,
            currency: &order.currency,
            now: now_ms,
        },
    )
    .await?;
    if !recorded {
        tx.rollback().await?;
        tracing::info!(
            order_id = %order_id,
            payment_id = %payment_id,
            "Payment callback replayed"
        );
        return Ok(VerificationOutcome::AlreadyProcessed {
            message: "Payment already processed.".to_string(),
        });
    }

    if !payment_orders::mark_paid(&mut *tx, order_id).await? {
        // Second payment against a fulfilled order: keep the record, book nothing
        tx.commit().await?;
        tracing::warn!(
            order_id = %order_id,
            payment_id = %payment_id,
            "Order already paid by another payment"
        );
        return Ok(VerificationOutcome::AlreadyProcessed {
            message: "Order already processed.".to_string(),
        });
    }

    let date_keys: Vec<String> = paid_for.iter().map(|(_, d)| d.to_string()).collect();
    let existing = meal_entries::existing_dates(&mut *tx, &employee_id, &date_keys).await?;
    let remaining: Vec<_> = paid_for
        .into_iter()
        .filter(|(_, date)| !existing.contains(&date.to_string()))
        .collect();

    if remaining.is_empty() {
        tx.commit().await?;
        tracing::info!(
            order_id = %order_id,
            employee_id = %employee_id,
            "Payment recorded, all dates already booked"
        );
        return Ok(VerificationOutcome::NothingToBook {
            message: "Payment verified, but all selected dates were already booked.".to_string(),
        });
    }

    let balance = user_points::balance(&mut *tx, &employee_id).await?;
    let plan = plan_batch(
        &state.prices,
        &employee_id,
        remaining,
        order.points_redeemed,
        balance,
    );
    let expected = to_minor_units(plan.payable());
    if expected > order.amount {
        tx.rollback().await?;
        tracing::warn!(
            order_id = %order_id,
            payment_id = %payment_id,
            expected,
            paid = order.amount,
            balance,
            "Paid amount does not cover the booking"
        );
        return Err(AppError::new(ErrorCode::PaymentInsufficientAmount)
            .with_detail("orderId", order_id)
            .with_detail("expected", expected)
            .with_detail("paid", order.amount)
            .into());
    }
    if expected < order.amount {
        tracing::warn!(
            order_id = %order_id,
            expected,
            paid = order.amount,
            "Paid amount exceeds the booking total"
        );
    }

    let points = plan.points_redeemed;
    let entries = plan.into_entries(order_id, PaymentMethod::Online, now_ms);
    if points > 0 {
        spend_points(
            &mut tx,
            &employee_id,
            points,
            &format!("Redemption (with Payment) for booking {} meal(s)", entries.len()),
            now_ms,
        )
        .await?;
    }
    insert_entries(&mut tx, &entries).await?;

    tx.commit().await?;

    tracing::info!(
        order_id = %order_id,
        employee_id = %employee_id,
        count = entries.len(),
        points,
        "Payment verified and meals booked"
    );
    Ok(VerificationOutcome::Booked {
        message: "Payment successful and meals booked!".to_string(),
        count: entries.len(),
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::razorpay::sign_payment;
    use crate::services::testing::{draft, monday_morning, state};

    const SECRET: &str = "test-razorpay-secret";

    fn request(drafts: Vec<MealEntryDraft>, redeem_points: i64) -> BookingRequest {
        BookingRequest {
            entries: drafts,
            redeem_points,
        }
    }

    fn gateway_order(id: &str, amount: i64) -> RazorpayOrder {
        RazorpayOrder {
            id: id.to_string(),
            amount,
            currency: CURRENCY.to_string(),
            receipt: None,
            status: Some("created".to_string()),
        }
    }

    async fn place_order(
        state: &AppState,
        req: &BookingRequest,
        order_id: &str,
    ) -> CreateOrderResponse {
        let plan = plan_booking(state, req, monday_morning()).await.unwrap();
        let order = gateway_order(order_id, to_minor_units(plan.payable()));
        record_order(state, &plan, &order, "receipt_1", monday_morning())
            .await
            .unwrap()
    }

    fn callback(
        order_id: &str,
        payment_id: &str,
        entries: Vec<MealEntryDraft>,
    ) -> PaymentVerification {
        PaymentVerification {
            razorpay_order_id: order_id.to_string(),
            razorpay_payment_id: payment_id.to_string(),
            razorpay_signature: sign_payment(order_id, payment_id, SECRET),
            entries,
        }
    }

    fn week() -> Vec<MealEntryDraft> {
        vec![
            draft("E1", "2025-01-06", MealType::Veg),
            draft("E1", "2025-01-08", MealType::NonVeg),
        ]
    }

    #[tokio::test]
    async fn test_record_order_stores_server_amount() {
        let state = state().await;
        let resp = place_order(&state, &request(week(), 0), "order_1").await;
        assert_eq!(resp.amount, 11_500);
        assert_eq!(resp.quote.total_cost, 115);
        assert_eq!(resp.key, "rzp_test_key");

        let stored = payment_orders::find(&state.pool, "order_1").await.unwrap().unwrap();
        assert_eq!(stored.status, PaymentOrderStatus::Created);
        assert_eq!(stored.employee_id, "E1");

        let ordered = payment_orders::list_entries(&state.pool, "order_1").await.unwrap();
        assert_eq!(ordered, resp.quote.entries);
    }

    #[tokio::test]
    async fn test_verified_payment_books_meals() {
        let state = state().await;
        place_order(&state, &request(week(), 0), "order_1").await;

        let outcome = verify_payment(&state, callback("order_1", "pay_1", week()), monday_morning())
            .await
            .unwrap();
        let VerificationOutcome::Booked { count, entries, .. } = outcome else {
            panic!("expected booking");
        };
        assert_eq!(count, 2);
        assert!(entries.iter().all(|e| e.payment_method == PaymentMethod::Online));

        let recorded = payments::list_all(&state.pool).await.unwrap();
        assert_eq!(recorded.len(), 1);
        assert_eq!(recorded[0].amount, 11_500);
        assert_eq!(recorded[0].date, "2025-01-06");

        let stored = payment_orders::find(&state.pool, "order_1").await.unwrap().unwrap();
        assert_eq!(stored.status, PaymentOrderStatus::Paid);
    }

    #[tokio::test]
    async fn test_bad_signature_writes_nothing() {
        let state = state().await;
        place_order(&state, &request(week(), 0), "order_1").await;

        let mut cb = callback("order_1", "pay_1", week());
        cb.razorpay_signature = sign_payment("order_1", "pay_1", "wrong-secret");
        let err = verify_payment(&state, cb, monday_morning()).await.unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::PaymentSignatureMismatch));

        assert_eq!(payments::count(&state.pool).await.unwrap(), 0);
        assert!(meal_entries::list_all(&state.pool).await.unwrap().is_empty());
        let stored = payment_orders::find(&state.pool, "order_1").await.unwrap().unwrap();
        assert_eq!(stored.status, PaymentOrderStatus::Created);
    }

    #[tokio::test]
    async fn test_replayed_callback_is_idempotent() {
        let state = state().await;
        place_order(&state, &request(week(), 0), "order_1").await;
        verify_payment(&state, callback("order_1", "pay_1", week()), monday_morning())
            .await
            .unwrap();

        let outcome = verify_payment(&state, callback("order_1", "pay_1", week()), monday_morning())
            .await
            .unwrap();
        assert!(matches!(outcome, VerificationOutcome::AlreadyProcessed { .. }));
        assert_eq!(payments::count(&state.pool).await.unwrap(), 1);
        assert_eq!(meal_entries::list_all(&state.pool).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_unknown_order_rejected() {
        let state = state().await;
        let err = verify_payment(&state, callback("order_x", "pay_1", week()), monday_morning())
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::PaymentOrderNotFound));
    }

    #[tokio::test]
    async fn test_dates_booked_meanwhile_are_skipped() {
        let state = state().await;
        user_points::credit(&state.pool, "E1", 45, 1).await.unwrap();
        place_order(&state, &request(week(), 0), "order_1").await;

        // Monday gets booked with points before the callback arrives
        crate::services::booking::create_booking(
            &state,
            request(vec![draft("E1", "2025-01-06", MealType::Veg)], 45),
            monday_morning(),
        )
        .await
        .unwrap();

        let outcome = verify_payment(&state, callback("order_1", "pay_1", week()), monday_morning())
            .await
            .unwrap();
        let VerificationOutcome::Booked { count, entries, .. } = outcome else {
            panic!("expected booking");
        };
        assert_eq!(count, 1);
        assert_eq!(entries[0].date, "2025-01-08");
        assert_eq!(payments::count(&state.pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_all_dates_taken_still_records_payment() {
        let state = state().await;
        user_points::credit(&state.pool, "E1", 45, 1).await.unwrap();
        let monday = vec![draft("E1", "2025-01-06", MealType::Veg)];
        place_order(&state, &request(monday.clone(), 0), "order_1").await;
        crate::services::booking::create_booking(
            &state,
            request(monday.clone(), 45),
            monday_morning(),
        )
        .await
        .unwrap();

        let outcome = verify_payment(&state, callback("order_1", "pay_1", monday), monday_morning())
            .await
            .unwrap();
        assert!(matches!(outcome, VerificationOutcome::NothingToBook { .. }));
        assert_eq!(payments::count(&state.pool).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_partial_points_with_payment() {
        let state = state().await;
        user_points::credit(&state.pool, "E1", 40, 1).await.unwrap();
        let resp = place_order(&state, &request(week(), 40), "order_1").await;
        assert_eq!(resp.quote.points_redeemed, 40);
        assert_eq!(resp.amount, 7_500);

        verify_payment(&state, callback("order_1", "pay_1", week()), monday_morning())
            .await
            .unwrap();
        assert_eq!(user_points::balance(&state.pool, "E1").await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_entries_from_other_employee_rejected() {
        let state = state().await;
        place_order(&state, &request(week(), 0), "order_1").await;
        let other = vec![draft("E2", "2025-01-06", MealType::Veg)];
        let err = verify_payment(&state, callback("order_1", "pay_1", other), monday_morning())
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::ValidationFailed));
        assert_eq!(payments::count(&state.pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_callback_books_only_ordered_dates() {
        let state = state().await;
        let monday = vec![draft("E1", "2025-01-06", MealType::Veg)];
        let resp = place_order(&state, &request(monday, 0), "order_1").await;
        assert_eq!(resp.amount, 4_500);

        let whole_week = (6..=10)
            .map(|d| draft("E1", &format!("2025-01-{d:02}"), MealType::Veg))
            .collect();
        let outcome = verify_payment(&state, callback("order_1", "pay_1", whole_week), monday_morning())
            .await
            .unwrap();
        let VerificationOutcome::Booked { count, entries, .. } = outcome else {
            panic!("expected booking");
        };
        assert_eq!(count, 1);
        assert_eq!(entries[0].date, "2025-01-06");
        assert_eq!(meal_entries::list_all(&state.pool).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_callback_keeps_ordered_meal_type() {
        let state = state().await;
        let wednesday = vec![draft("E1", "2025-01-08", MealType::Veg)];
        place_order(&state, &request(wednesday, 0), "order_1").await;

        let upgraded = vec![draft("E1", "2025-01-08", MealType::NonVeg)];
        let outcome = verify_payment(&state, callback("order_1", "pay_1", upgraded), monday_morning())
            .await
            .unwrap();
        let VerificationOutcome::Booked { entries, .. } = outcome else {
            panic!("expected booking");
        };
        assert_eq!(entries[0].meal_type, MealType::Veg);
    }

    #[tokio::test]
    async fn test_callback_without_ordered_dates_rejected() {
        let state = state().await;
        let monday = vec![draft("E1", "2025-01-06", MealType::Veg)];
        place_order(&state, &request(monday, 0), "order_1").await;

        let tuesday = vec![draft("E1", "2025-01-07", MealType::Veg)];
        let err = verify_payment(&state, callback("order_1", "pay_1", tuesday), monday_morning())
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::ValidationFailed));
        assert_eq!(payments::count(&state.pool).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_spent_balance_leaves_payment_short() {
        let state = state().await;
        user_points::credit(&state.pool, "E1", 40, 1).await.unwrap();
        let resp = place_order(&state, &request(week(), 40), "order_1").await;
        assert_eq!(resp.amount, 7_500);

        // Points leave the balance between order and callback
        assert!(user_points::debit(&state.pool, "E1", 40, 2).await.unwrap());

        let err = verify_payment(&state, callback("order_1", "pay_1", week()), monday_morning())
            .await
            .unwrap_err();
        assert_eq!(err.code(), Some(ErrorCode::PaymentInsufficientAmount));
        assert_eq!(payments::count(&state.pool).await.unwrap(), 0);
        assert!(meal_entries::list_all(&state.pool).await.unwrap().is_empty());
        let stored = payment_orders::find(&state.pool, "order_1").await.unwrap().unwrap();
        assert_eq!(stored.status, PaymentOrderStatus::Created);
    }
}
