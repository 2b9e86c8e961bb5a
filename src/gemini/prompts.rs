//! Fixed instructions sent alongside the images.

use super::tryon_client::BodyAdjustment;

pub const MODEL_IMAGE_PROMPT: &str = "You are an expert fashion photographer AI. Transform the person in this image into a full-body photo of a fitness model, suitable for an athletic apparel catalogue. Keep the person's identity, face, skin tone and hair exactly as they are. Pose them in a confident, athletic standing pose with the whole body visible from head to feet. Place them in front of a clean, neutral light-gray studio backdrop with soft, even lighting. Return ONLY the final image.";

pub const VIRTUAL_TRY_ON_PROMPT: &str = "You are an expert virtual try-on AI. You are given a 'model image' followed by a 'garment image'. Create a new photorealistic image where the person from the model image wears the clothing from the garment image. Completely replace the clothing item of the same category that the person currently wears; no part of it may remain visible. Preserve the person's face, hair, body shape and pose, and keep the background unchanged. Fit the garment naturally, with realistic folds, shadows and lighting consistent with the scene. Return ONLY the final, edited image.";

/// Ready-made instructions offered on the canvas.
pub const POSE_PRESETS: &[&str] = &[
    "Full frontal view, hands on hips",
    "Slightly turned, 3/4 view",
    "Side profile view",
    "Jumping in the air, mid-action shot",
    "Walking towards camera",
    "Leaning against a wall",
];

pub fn pose_variation_prompt(pose: &str) -> String {
    format!(
        "You are an expert fashion photographer AI. Regenerate this image with the person in a new pose. The person, their clothing, physique and the background style must remain identical. The new pose is: \"{}\". Return ONLY the final image.",
        pose.trim()
    )
}

pub fn body_adjustment_prompt(direction: BodyAdjustment) -> String {
    let change = match direction {
        BodyAdjustment::More => {
            "noticeably more toned and athletic, with slightly more defined muscles"
        }
        BodyAdjustment::Less => "noticeably less toned, with a softer and less muscular build",
    };
    format!(
        "You are an expert photo retoucher AI. Adjust the physique of the person in this image so they look {}. Keep their face, identity, clothing, pose, background and lighting identical. The change must be subtle and realistic. Return ONLY the final image.",
        change
    )
}
