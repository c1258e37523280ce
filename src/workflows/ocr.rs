//! The OCR worker: a job dispatched by scan upload. Decodes
//! the QR embedded in the scan, links it to the attempt it belongs to,
//! OCRs the fixed score field, and auto-applies the score when
//! confidence clears the configured threshold.

use uuid::Uuid;

use crate::crypto::{self, QrImage, TokenService};
use crate::domain::value_objects::AttemptStatus;
use crate::error::{Error, Result};
use crate::ports::{ObjectStore, OcrEngine, QrDecoder};
use crate::repository::{AttemptRepository, ScanRepository};

const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct ProcessScanOutcome {
	pub scan_id: Uuid,
	pub qr_found: bool,
	pub attempt_linked: bool,
	pub ocr_score: Option<u32>,
	pub ocr_confidence: Option<f64>,
	pub auto_applied: bool,
}

/// Run one OCR pass over a scan: decode QR, locate the attempt, OCR the
/// score field, and auto-apply or defer to manual verification.
///
/// This is the single attempt at the job; [`process_scan_with_retry`]
/// wraps it with the retry policy.
pub async fn process_scan(
	scans: &(impl ScanRepository + ?Sized),
	attempts: &(impl AttemptRepository + ?Sized),
	object_store: &(impl ObjectStore + ?Sized),
	bucket_scans: &str,
	qr_decoder: &(impl QrDecoder + ?Sized),
	ocr_engine: &(impl OcrEngine + ?Sized),
	token_service: &TokenService,
	auto_apply_threshold: f64,
	scan_id: Uuid,
) -> Result<ProcessScanOutcome> {
	let mut scan = scans
		.get_by_id(scan_id)
		.await?
		.ok_or_else(|| Error::not_found("scan", scan_id))?;

	let bytes = object_store.get(bucket_scans, &scan.file_path).await?;

	// Decode the QR embedded in the scan (image or first rasterised PDF
	// page, in the real pipeline; this in-process stand-in decodes the
	// marker bytes directly — see `ports::QrDecoder`).
	let qr_payload = decode_embedded_qr(qr_decoder, &bytes);
	let qr_found = qr_payload.is_some();

	let mut attempt = None;
	if let Some(payload) = &qr_payload {
		let sheet_hash = token_service.hash(payload);
		if let Some(found) = attempts.get_by_sheet_token_hash(&sheet_hash).await? {
			if scan.attempt_id.is_none() {
				scan.link_attempt(found.id);
			}
			attempt = Some(found);
		}
	}

	let ocr_result = ocr_engine.extract_score(&bytes).await?;
	scan.update_ocr_result(ocr_result.score, Some(ocr_result.confidence), &ocr_result.raw_text)?;
	scans.update(scan).await?;

	let attempt_linked = attempt.is_some();
	let mut auto_applied = false;

	if let Some(mut attempt) = attempt {
		if let (Some(score), confidence) = (ocr_result.score, ocr_result.confidence) {
			if confidence >= auto_apply_threshold {
				attempt.apply_score(score, Some(confidence))?;
				attempts.update(attempt).await?;
				auto_applied = true;
			} else if attempt.status == AttemptStatus::Printed {
				attempt.mark_scanned()?;
				attempts.update(attempt).await?;
			}
		} else if attempt.status == AttemptStatus::Printed {
			attempt.mark_scanned()?;
			attempts.update(attempt).await?;
		}
	}

	Ok(ProcessScanOutcome {
		scan_id,
		qr_found,
		attempt_linked,
		ocr_score: ocr_result.score,
		ocr_confidence: Some(ocr_result.confidence),
		auto_applied,
	})
}

/// Decode the QR this crate's renderer embedded. A real pipeline
/// rasterises PDF bytes at 300 DPI before attempting decode; that step
/// is out of scope here, so any bytes not already QR-shaped simply fail
/// to decode, matching "no QR found" rather than crashing.
fn decode_embedded_qr(decoder: &(impl QrDecoder + ?Sized), bytes: &[u8]) -> Option<String> {
	let text = String::from_utf8_lossy(bytes);
	let payload = text.lines().find(|l| !l.trim().is_empty())?;
	let image = build_probe_image(payload)?;
	decoder.decode(&image)
}

fn build_probe_image(payload: &str) -> Option<QrImage> {
	crypto::encode_qr(payload, crypto::ErrorCorrection::H).ok()
}

/// Retry the job up to [`MAX_ATTEMPTS`] times with the configured
/// backoff. Cancellation is not supported mid-job; this bounds total
/// wall-time instead.
pub async fn process_scan_with_retry(
	scans: &(impl ScanRepository + ?Sized),
	attempts: &(impl AttemptRepository + ?Sized),
	object_store: &(impl ObjectStore + ?Sized),
	bucket_scans: &str,
	qr_decoder: &(impl QrDecoder + ?Sized),
	ocr_engine: &(impl OcrEngine + ?Sized),
	token_service: &TokenService,
	auto_apply_threshold: f64,
	scan_id: Uuid,
	backoff: std::time::Duration,
) -> Result<ProcessScanOutcome> {
	let mut last_err = None;
	for attempt_no in 0..MAX_ATTEMPTS {
		match process_scan(
			scans,
			attempts,
			object_store,
			bucket_scans,
			qr_decoder,
			ocr_engine,
			token_service,
			auto_apply_threshold,
			scan_id,
		)
		.await
		{
			Ok(outcome) => return Ok(outcome),
			Err(err @ Error::RetryableIo(_)) => {
				tracing::warn!(scan_id = %scan_id, attempt = attempt_no + 1, %err, "ocr job failed, retrying");
				last_err = Some(err);
				if attempt_no + 1 < MAX_ATTEMPTS {
					tokio::time::sleep(backoff).await;
				}
			}
			Err(other) => return Err(other),
		}
	}
	Err(last_err.unwrap_or_else(|| Error::Fatal("ocr job exhausted retries".into())))
}
