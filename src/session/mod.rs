pub mod outfit;
pub mod screen;
pub mod wardrobe;

use crate::{
    data_url::DataUrl,
    error::Result,
    gemini::{prompts::POSE_PRESETS, BodyAdjustment, ContentGenerator, ImageInput, TryOnClient},
    models::WardrobeItem,
};
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};

pub use outfit::{Outfit, OutfitLayer};
pub use screen::{user_message, Outcome, RequestToken, Screen, ScreenKind, ScreenStatus};
pub use wardrobe::Wardrobe;

#[derive(Debug, Default)]
struct SessionState {
    upload: Screen,
    canvas: Screen,
    adjustment: Screen,
    source_photo: Option<DataUrl>,
    outfit: Outfit,
    selected_pose: Option<String>,
    wardrobe: Wardrobe,
}

impl SessionState {
    fn screen(&self, kind: ScreenKind) -> &Screen {
        match kind {
            ScreenKind::Upload => &self.upload,
            ScreenKind::Canvas => &self.canvas,
            ScreenKind::Adjustment => &self.adjustment,
        }
    }

    fn screen_mut(&mut self, kind: ScreenKind) -> &mut Screen {
        match kind {
            ScreenKind::Upload => &mut self.upload,
            ScreenKind::Canvas => &mut self.canvas,
            ScreenKind::Adjustment => &mut self.adjustment,
        }
    }

    fn current_image(&self) -> Option<&DataUrl> {
        self.outfit
            .top()
            .map(|layer| layer.image_for(self.selected_pose.as_deref()))
    }
}

/// One user's try-on session: the screens, their images and the wardrobe.
///
/// All methods take `&self`. State sits behind a mutex that is released
/// before every generation call, so a session shared through an `Arc` can
/// see overlapping actions; each screen drops the ones it is not ready for.
pub struct TryOnSession<G> {
    client: TryOnClient<G>,
    state: Mutex<SessionState>,
}

impl<G: ContentGenerator> TryOnSession<G> {
    pub fn new(client: TryOnClient<G>) -> Self {
        Self {
            client,
            state: Mutex::new(SessionState::default()),
        }
    }

    pub fn client(&self) -> &TryOnClient<G> {
        &self.client
    }

    fn lock(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn begin(&self, kind: ScreenKind) -> Option<RequestToken> {
        let token = self.lock().screen_mut(kind).begin();
        if token.is_none() {
            log::debug!("{:?} busy, ignoring request", kind);
        }
        token
    }

    // ── Upload ──────────────────────────────────────────────────────

    /// Turns the uploaded photo into the model image everything else builds on.
    pub async fn create_model(&self, photo: impl Into<ImageInput>) -> Outcome<DataUrl> {
        let Some(token) = self.begin(ScreenKind::Upload) else {
            return Outcome::Ignored;
        };
        log::info!("📸 Creating model image");

        let result = self.generate_model(photo.into()).await;

        let mut state = self.lock();
        let outcome = state.upload.finish(token, result);
        match outcome {
            Outcome::Applied((photo, model)) => {
                state.source_photo = Some(photo);
                state.outfit = Outfit::new(model.clone());
                state.selected_pose = None;
                // results computed against a previous model no longer apply
                state.canvas.reset();
                state.adjustment.reset();
                log::info!("✅ Model image ready");
                Outcome::Applied(model)
            }
            Outcome::Failed(message) => Outcome::Failed(message),
            Outcome::Ignored => Outcome::Ignored,
            Outcome::Discarded => {
                log::debug!("Dropping model image from a reset session");
                Outcome::Discarded
            }
        }
    }

    async fn generate_model(&self, photo: ImageInput) -> Result<(DataUrl, DataUrl)> {
        let photo = photo.to_data_url().await?;
        let model = self.client.generate_model_image(&photo).await?;
        Ok((photo, model))
    }

    /// The before/after pair shown on the compare screen.
    pub fn comparison(&self) -> Option<(DataUrl, DataUrl)> {
        let state = self.lock();
        let photo = state.source_photo.clone()?;
        let model = state.outfit.model_image()?.clone();
        Some((photo, model))
    }

    // ── Canvas ──────────────────────────────────────────────────────

    /// Dresses the displayed image in a wardrobe garment and stacks the result.
    pub async fn apply_garment(&self, item_id: &str) -> Outcome<DataUrl> {
        let (token, current, garment) = {
            let mut state = self.lock();
            let Some(current) = state.current_image().cloned() else {
                return Outcome::Ignored;
            };
            let Some(garment) = state.wardrobe.get(item_id).cloned() else {
                log::warn!("Unknown wardrobe item {}", item_id);
                return Outcome::Ignored;
            };
            let Some(token) = state.canvas.begin() else {
                return Outcome::Ignored;
            };
            (token, current, garment)
        };
        log::info!("👗 Trying on '{}'", garment.name);

        // the wardrobe copy is authoritative; `file` only records where it came from
        let result = self
            .client
            .generate_virtual_try_on_image(current, &garment.url)
            .await;

        let mut state = self.lock();
        let outcome = state.canvas.finish(token, result);
        if let Outcome::Applied(image) = &outcome {
            state.outfit.push_garment(garment, image.clone());
            state.selected_pose = None;
        }
        outcome
    }

    /// Takes the top garment off. Refused while the canvas or the
    /// adjustment panel is busy.
    pub fn remove_last_garment(&self) -> Option<WardrobeItem> {
        let mut state = self.lock();
        if state.canvas.is_pending() || state.adjustment.is_pending() {
            return None;
        }
        let removed = state.outfit.pop_garment()?;
        state.selected_pose = None;
        log::info!("Removed '{}' from the outfit", removed.name);
        Some(removed)
    }

    /// Shows the top layer in the given pose, generating it on first use.
    pub async fn select_pose(&self, instruction: &str) -> Outcome<DataUrl> {
        let instruction = instruction.trim().to_string();
        let (token, base) = {
            let mut state = self.lock();
            let Some(top) = state.outfit.top() else {
                return Outcome::Ignored;
            };
            if let Some(cached) = top.pose_images.get(&instruction).cloned() {
                if state.canvas.is_pending() {
                    return Outcome::Ignored;
                }
                state.selected_pose = Some(instruction);
                return Outcome::Applied(cached);
            }
            let base = top.base_image.clone();
            let Some(token) = state.canvas.begin() else {
                return Outcome::Ignored;
            };
            (token, base)
        };
        log::info!("🕺 Generating pose: {}", instruction);

        let result = self
            .client
            .generate_pose_variation(base, &instruction)
            .await;

        let mut state = self.lock();
        let outcome = state.canvas.finish(token, result);
        if let Outcome::Applied(image) = &outcome {
            if let Some(top) = state.outfit.top_mut() {
                top.pose_images.insert(instruction.clone(), image.clone());
            }
            state.selected_pose = Some(instruction);
        }
        outcome
    }

    pub fn pose_presets(&self) -> &'static [&'static str] {
        POSE_PRESETS
    }

    /// Clears photo, model and outfit. In-flight results are discarded.
    pub fn start_over(&self) {
        let mut state = self.lock();
        state.upload.reset();
        state.canvas.reset();
        state.adjustment.reset();
        state.source_photo = None;
        state.outfit = Outfit::default();
        state.selected_pose = None;
        log::info!("🔄 Session reset");
    }

    // ── Adjustment panel ────────────────────────────────────────────

    /// Nudges the physique of the displayed image and replaces it.
    ///
    /// The result only lands if the same layer is still on top showing the
    /// same image; otherwise it is discarded.
    pub async fn adjust_body(&self, direction: BodyAdjustment) -> Outcome<DataUrl> {
        let (token, depth, current) = {
            let mut state = self.lock();
            let Some(current) = state.current_image().cloned() else {
                return Outcome::Ignored;
            };
            let Some(token) = state.adjustment.begin() else {
                return Outcome::Ignored;
            };
            (token, state.outfit.layers().len(), current)
        };
        log::info!("💪 Adjusting physique: {}", direction);

        let result = self.client.adjust_body_shape(&current, direction).await;

        let mut state = self.lock();
        let outcome = state.adjustment.finish(token, result);
        let unchanged =
            state.outfit.layers().len() == depth && state.current_image() == Some(&current);
        if outcome.is_applied() && !unchanged {
            log::debug!("Outfit changed during adjustment, dropping result");
            return Outcome::Discarded;
        }
        if let Outcome::Applied(image) = &outcome {
            let pose = state.selected_pose.clone();
            if let Some(top) = state.outfit.top_mut() {
                match pose.filter(|pose| top.pose_images.contains_key(pose)) {
                    Some(pose) => {
                        top.pose_images.insert(pose, image.clone());
                    }
                    None => {
                        // cached poses show the old physique
                        top.base_image = image.clone();
                        top.pose_images.clear();
                    }
                }
            }
        }
        outcome
    }

    // ── Wardrobe ────────────────────────────────────────────────────

    pub async fn add_garment_file(&self, path: impl AsRef<Path>) -> Result<WardrobeItem> {
        let item = Wardrobe::load_file(path).await?;
        Ok(self.lock().wardrobe.add(item).clone())
    }

    pub fn add_garment(&self, item: WardrobeItem) {
        self.lock().wardrobe.add(item);
    }

    pub fn remove_garment(&self, id: &str) -> Option<WardrobeItem> {
        self.lock().wardrobe.remove(id)
    }

    pub fn wardrobe(&self) -> Vec<WardrobeItem> {
        self.lock().wardrobe.items().to_vec()
    }

    // ── Views ───────────────────────────────────────────────────────

    pub fn status(&self, kind: ScreenKind) -> ScreenStatus {
        self.lock().screen(kind).status().clone()
    }

    pub fn dismiss_error(&self, kind: ScreenKind) {
        self.lock().screen_mut(kind).dismiss_error();
    }

    pub fn current_image(&self) -> Option<DataUrl> {
        self.lock().current_image().cloned()
    }

    pub fn source_photo(&self) -> Option<DataUrl> {
        self.lock().source_photo.clone()
    }

    pub fn selected_pose(&self) -> Option<String> {
        self.lock().selected_pose.clone()
    }

    /// Garments currently worn, bottom to top.
    pub fn worn_garments(&self) -> Vec<WardrobeItem> {
        self.lock().outfit.garments().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TryOnError;
    use crate::gemini::testing::{image_response, GatedGenerator, ScriptedGenerator};
    use crate::models::GenerateContentResponse;
    use std::sync::Arc;

    fn image(tag: &[u8]) -> DataUrl {
        DataUrl::from_bytes("image/png", tag)
    }

    fn scripted(script: Vec<Result<GenerateContentResponse>>) -> TryOnSession<ScriptedGenerator> {
        TryOnSession::new(TryOnClient::new(ScriptedGenerator::new(script)))
    }

    fn gated(
        script: Vec<Result<GenerateContentResponse>>,
    ) -> (Arc<GatedGenerator>, Arc<TryOnSession<Arc<GatedGenerator>>>) {
        let generator = Arc::new(GatedGenerator::new(script));
        let session = Arc::new(TryOnSession::new(TryOnClient::new(generator.clone())));
        (generator, session)
    }

    #[tokio::test]
    async fn test_create_model_sets_comparison_pair() {
        let session = scripted(vec![Ok(image_response("image/png", b"model"))]);

        let outcome = session.create_model(image(b"photo")).await;
        assert_eq!(outcome, Outcome::Applied(image(b"model")));
        assert_eq!(session.status(ScreenKind::Upload), ScreenStatus::Idle);
        assert_eq!(session.comparison(), Some((image(b"photo"), image(b"model"))));
        assert_eq!(session.current_image(), Some(image(b"model")));
    }

    #[tokio::test]
    async fn test_failure_surfaces_as_error_status_and_retry_works() {
        let session = scripted(vec![
            Err(TryOnError::GenerationInterrupted("IMAGE_SAFETY".into())),
            Ok(image_response("image/png", b"model")),
        ]);

        let outcome = session.create_model(image(b"photo")).await;
        assert!(matches!(outcome, Outcome::Failed(ref m) if m.contains("IMAGE_SAFETY")));
        assert!(matches!(
            session.status(ScreenKind::Upload),
            ScreenStatus::Error(_)
        ));
        assert!(session.current_image().is_none());

        assert!(session.create_model(image(b"photo")).await.is_applied());
        assert_eq!(session.status(ScreenKind::Upload), ScreenStatus::Idle);
    }

    #[tokio::test]
    async fn test_malformed_upload_never_reaches_the_model() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("resume.txt");
        std::fs::write(&path, b"plain text").unwrap();

        let session = scripted(vec![]);
        let outcome = session.create_model(path).await;
        assert!(matches!(outcome, Outcome::Failed(ref m) if m.contains("could not be read")));
        assert!(session.client().generator().requests().is_empty());

        session.dismiss_error(ScreenKind::Upload);
        assert_eq!(session.status(ScreenKind::Upload), ScreenStatus::Idle);
    }

    #[tokio::test]
    async fn test_canvas_actions_need_a_model() {
        let session = scripted(vec![]);
        let item = WardrobeItem::new("tee", image(b"tee"));
        let id = item.id.clone();
        session.add_garment(item);

        assert_eq!(session.apply_garment(&id).await, Outcome::Ignored);
        assert_eq!(session.select_pose("Side profile view").await, Outcome::Ignored);
        assert_eq!(session.adjust_body(BodyAdjustment::More).await, Outcome::Ignored);
        assert!(session.client().generator().requests().is_empty());
    }

    #[tokio::test]
    async fn test_outfit_stack_and_undo() {
        let session = scripted(vec![
            Ok(image_response("image/png", b"model")),
            Ok(image_response("image/png", b"with-tee")),
            Ok(image_response("image/png", b"with-tee-and-cap")),
        ]);
        session.create_model(image(b"photo")).await;

        let tee = WardrobeItem::new("tee", image(b"tee"));
        let cap = WardrobeItem::new("cap", image(b"cap"));
        session.add_garment(tee.clone());
        session.add_garment(cap.clone());

        assert!(session.apply_garment(&tee.id).await.is_applied());
        assert!(session.apply_garment(&cap.id).await.is_applied());
        assert_eq!(session.current_image(), Some(image(b"with-tee-and-cap")));
        assert_eq!(session.worn_garments(), vec![tee.clone(), cap.clone()]);

        // the cap goes on top of the tee render
        let requests = session.client().generator().requests();
        let parts: Vec<_> = requests[2].parts().collect();
        assert_eq!(parts[0].image().unwrap().data, image(b"with-tee").payload());
        assert_eq!(parts[1].image().unwrap().data, image(b"cap").payload());

        assert_eq!(session.remove_last_garment(), Some(cap));
        assert_eq!(session.current_image(), Some(image(b"with-tee")));
        assert_eq!(session.remove_last_garment(), Some(tee));
        assert_eq!(session.remove_last_garment(), None);
        assert_eq!(session.current_image(), Some(image(b"model")));
    }

    #[tokio::test]
    async fn test_unknown_garment_is_ignored() {
        let session = scripted(vec![Ok(image_response("image/png", b"model"))]);
        session.create_model(image(b"photo")).await;
        assert_eq!(session.apply_garment("missing").await, Outcome::Ignored);
        assert_eq!(session.status(ScreenKind::Canvas), ScreenStatus::Idle);
    }

    #[tokio::test]
    async fn test_garment_upload_survives_file_removal() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hoodie.png");
        std::fs::write(&path, b"hoodie").unwrap();

        let session = scripted(vec![
            Ok(image_response("image/png", b"model")),
            Ok(image_response("image/png", b"with-hoodie")),
        ]);
        session.create_model(image(b"photo")).await;
        let item = session.add_garment_file(&path).await.unwrap();
        assert_eq!(session.wardrobe().len(), 1);

        // the upload is held in memory; the file is not needed any more
        std::fs::remove_file(&path).unwrap();

        assert!(session.apply_garment(&item.id).await.is_applied());
        assert_eq!(session.worn_garments()[0].name, "hoodie");
        let requests = session.client().generator().requests();
        let parts: Vec<_> = requests[1].parts().collect();
        assert_eq!(parts[1].image().unwrap().data, image(b"hoodie").payload());

        assert!(session.remove_garment(&item.id).is_some());
        assert!(session.wardrobe().is_empty());
    }

    #[tokio::test]
    async fn test_pose_results_are_cached_per_layer() {
        let session = scripted(vec![
            Ok(image_response("image/png", b"model")),
            Ok(image_response("image/png", b"side")),
        ]);
        session.create_model(image(b"photo")).await;

        let pose = session.pose_presets()[2];
        assert_eq!(session.select_pose(pose).await, Outcome::Applied(image(b"side")));
        assert_eq!(session.selected_pose().as_deref(), Some(pose));
        assert_eq!(session.current_image(), Some(image(b"side")));

        // second selection is served from the cache
        assert_eq!(session.select_pose(pose).await, Outcome::Applied(image(b"side")));
        assert_eq!(session.client().generator().requests().len(), 2);
    }

    #[tokio::test]
    async fn test_blank_pose_fails_on_canvas() {
        let session = scripted(vec![Ok(image_response("image/png", b"model"))]);
        session.create_model(image(b"photo")).await;

        let outcome = session.select_pose("  ").await;
        assert!(matches!(outcome, Outcome::Failed(_)));
        assert!(matches!(
            session.status(ScreenKind::Canvas),
            ScreenStatus::Error(_)
        ));
        assert_eq!(session.current_image(), Some(image(b"model")));
    }

    #[tokio::test]
    async fn test_adjust_more_then_less() {
        let session = scripted(vec![
            Ok(image_response("image/png", b"model")),
            Ok(image_response("image/png", b"toned")),
            Ok(image_response("image/png", b"softer")),
        ]);
        session.create_model(image(b"photo")).await;

        assert_eq!(
            session.adjust_body(BodyAdjustment::More).await,
            Outcome::Applied(image(b"toned"))
        );
        assert_eq!(
            session.adjust_body(BodyAdjustment::Less).await,
            Outcome::Applied(image(b"softer"))
        );
        assert_eq!(session.current_image(), Some(image(b"softer")));
        assert_eq!(session.status(ScreenKind::Adjustment), ScreenStatus::Idle);
    }

    #[tokio::test]
    async fn test_adjusting_a_pose_keeps_the_base() {
        let session = scripted(vec![
            Ok(image_response("image/png", b"model")),
            Ok(image_response("image/png", b"side")),
            Ok(image_response("image/png", b"side-toned")),
        ]);
        session.create_model(image(b"photo")).await;
        session.select_pose("Side profile view").await;

        session.adjust_body(BodyAdjustment::More).await;
        assert_eq!(session.current_image(), Some(image(b"side-toned")));
        assert_eq!(session.comparison().unwrap().1, image(b"model"));
    }

    #[tokio::test]
    async fn test_overlapping_request_is_ignored() {
        let (generator, session) = gated(vec![Ok(image_response("image/png", b"model"))]);

        let first = tokio::spawn({
            let session = session.clone();
            async move { session.create_model(image(b"photo")).await }
        });
        generator.wait_entered(1).await;
        assert_eq!(session.status(ScreenKind::Upload), ScreenStatus::Pending);

        assert_eq!(session.create_model(image(b"again")).await, Outcome::Ignored);

        generator.release(1);
        assert_eq!(first.await.unwrap(), Outcome::Applied(image(b"model")));
        assert_eq!(generator.entered(), 1);
    }

    #[tokio::test]
    async fn test_adjustments_are_serialized() {
        let (generator, session) = gated(vec![
            Ok(image_response("image/png", b"model")),
            Ok(image_response("image/png", b"toned")),
        ]);
        generator.release(1);
        session.create_model(image(b"photo")).await;

        let pending = tokio::spawn({
            let session = session.clone();
            async move { session.adjust_body(BodyAdjustment::More).await }
        });
        generator.wait_entered(2).await;

        assert_eq!(session.adjust_body(BodyAdjustment::Less).await, Outcome::Ignored);
        // the canvas is independent of the adjustment panel
        assert_eq!(session.status(ScreenKind::Canvas), ScreenStatus::Idle);

        generator.release(1);
        assert_eq!(pending.await.unwrap(), Outcome::Applied(image(b"toned")));
    }

    #[tokio::test]
    async fn test_start_over_discards_stray_response() {
        let (generator, session) = gated(vec![Ok(image_response("image/png", b"stale"))]);

        let pending = tokio::spawn({
            let session = session.clone();
            async move { session.create_model(image(b"photo")).await }
        });
        generator.wait_entered(1).await;

        session.start_over();
        assert_eq!(session.status(ScreenKind::Upload), ScreenStatus::Idle);

        generator.release(1);
        assert_eq!(pending.await.unwrap(), Outcome::Discarded);
        assert!(session.current_image().is_none());
        assert!(session.comparison().is_none());
        assert_eq!(session.status(ScreenKind::Upload), ScreenStatus::Idle);
    }

    #[tokio::test]
    async fn test_new_request_after_reset_wins() {
        let (generator, session) = gated(vec![
            Ok(image_response("image/png", b"first")),
            Ok(image_response("image/png", b"second")),
        ]);

        let stale = tokio::spawn({
            let session = session.clone();
            async move { session.create_model(image(b"one")).await }
        });
        generator.wait_entered(1).await;
        session.start_over();

        let fresh = tokio::spawn({
            let session = session.clone();
            async move { session.create_model(image(b"two")).await }
        });
        generator.wait_entered(2).await;
        generator.release(2);

        assert_eq!(stale.await.unwrap(), Outcome::Discarded);
        let applied = fresh.await.unwrap().applied().unwrap();
        assert_eq!(session.current_image(), Some(applied));
        assert_eq!(session.source_photo(), Some(image(b"two")));
    }

    #[tokio::test]
    async fn test_new_model_discards_pending_canvas_result() {
        let (generator, session) = gated(vec![
            Ok(image_response("image/png", b"model-a")),
            Ok(image_response("image/png", b"model-b")),
            Ok(image_response("image/png", b"pose-a")),
        ]);
        generator.release(1);
        session.create_model(image(b"photo-a")).await;

        let model = tokio::spawn({
            let session = session.clone();
            async move { session.create_model(image(b"photo-b")).await }
        });
        generator.wait_entered(2).await;

        let pose = tokio::spawn({
            let session = session.clone();
            async move { session.select_pose("Walking towards camera").await }
        });
        generator.wait_entered(3).await;

        // waiters are released in arrival order: the new model lands first
        generator.release(1);
        assert_eq!(model.await.unwrap(), Outcome::Applied(image(b"model-b")));
        generator.release(1);
        assert_eq!(pose.await.unwrap(), Outcome::Discarded);

        assert_eq!(session.current_image(), Some(image(b"model-b")));
        assert!(session.selected_pose().is_none());
        assert_eq!(session.status(ScreenKind::Canvas), ScreenStatus::Idle);
    }

    #[tokio::test]
    async fn test_undo_is_refused_while_adjusting() {
        let (generator, session) = gated(vec![
            Ok(image_response("image/png", b"model")),
            Ok(image_response("image/png", b"with-tee")),
            Ok(image_response("image/png", b"with-tee-toned")),
        ]);
        generator.release(2);
        session.create_model(image(b"photo")).await;
        let tee = WardrobeItem::new("tee", image(b"tee"));
        session.add_garment(tee.clone());
        assert!(session.apply_garment(&tee.id).await.is_applied());

        let pending = tokio::spawn({
            let session = session.clone();
            async move { session.adjust_body(BodyAdjustment::More).await }
        });
        generator.wait_entered(3).await;
        assert_eq!(session.remove_last_garment(), None);

        generator.release(1);
        assert_eq!(
            pending.await.unwrap(),
            Outcome::Applied(image(b"with-tee-toned"))
        );
        assert_eq!(session.comparison().unwrap().1, image(b"model"));

        assert_eq!(session.remove_last_garment(), Some(tee));
        assert_eq!(session.current_image(), Some(image(b"model")));
    }

    #[tokio::test]
    async fn test_adjustment_dropped_when_garment_lands_first() {
        let (generator, session) = gated(vec![
            Ok(image_response("image/png", b"model")),
            Ok(image_response("image/png", b"with-tee")),
            Ok(image_response("image/png", b"model-toned")),
        ]);
        generator.release(1);
        session.create_model(image(b"photo")).await;
        let tee = WardrobeItem::new("tee", image(b"tee"));
        session.add_garment(tee.clone());

        let dress = tokio::spawn({
            let session = session.clone();
            let id = tee.id.clone();
            async move { session.apply_garment(&id).await }
        });
        generator.wait_entered(2).await;
        let adjust = tokio::spawn({
            let session = session.clone();
            async move { session.adjust_body(BodyAdjustment::More).await }
        });
        generator.wait_entered(3).await;

        generator.release(1);
        assert_eq!(dress.await.unwrap(), Outcome::Applied(image(b"with-tee")));
        generator.release(1);
        assert_eq!(adjust.await.unwrap(), Outcome::Discarded);

        assert_eq!(
            session.comparison(),
            Some((image(b"photo"), image(b"model")))
        );
        assert_eq!(session.current_image(), Some(image(b"with-tee")));
        assert_eq!(session.status(ScreenKind::Adjustment), ScreenStatus::Idle);
    }
}
