//! Deterministic stand-in for the generation service.
//!
//! Produces three fixed concept archetypes after a fixed delay. The scene
//! layout is tuned for a 30-second video and scaled for other lengths.

use std::time::Duration;

use async_trait::async_trait;
use foobi_models::{Concept, CreativeBrief, Scene};
use tracing::debug;

use crate::backend::{ConceptGenerator, VideoRenderer};
use crate::error::GenerationResult;
use crate::types::RenderedVideo;

/// Reference length the canned scene boundaries are authored for.
const REFERENCE_LENGTH_SECS: u32 = 30;

/// Shortest timeline that still gives each of the four scenes one second.
const MIN_LENGTH_SECS: u32 = 4;

const SAMPLE_VIDEO_URL: &str =
    "https://commondatastorage.googleapis.com/gtv-videos-bucket/sample/BigBuckBunny.mp4";

const SAMPLE_THUMBNAIL_URL: &str =
    "https://images.pexels.com/photos/3184291/pexels-photo-3184291.jpeg?auto=compress&cs=tinysrgb&w=400";

/// Mock studio with configurable latency.
#[derive(Debug, Clone)]
pub struct MockStudio {
    concept_latency: Duration,
    render_latency: Duration,
}

impl Default for MockStudio {
    fn default() -> Self {
        Self {
            concept_latency: Duration::from_secs(3),
            render_latency: Duration::from_secs(8),
        }
    }
}

impl MockStudio {
    pub fn new(concept_latency: Duration, render_latency: Duration) -> Self {
        Self {
            concept_latency,
            render_latency,
        }
    }

    /// Studio that answers immediately.
    pub fn instant() -> Self {
        Self::new(Duration::ZERO, Duration::ZERO)
    }
}

#[async_trait]
impl ConceptGenerator for MockStudio {
    async fn generate_concepts(&self, brief: &CreativeBrief) -> GenerationResult<Vec<Concept>> {
        debug!(title = %brief.title, length_secs = brief.length_secs, "Mock concept generation");
        tokio::time::sleep(self.concept_latency).await;
        Ok(canned_concepts(brief))
    }
}

#[async_trait]
impl VideoRenderer for MockStudio {
    async fn render_video(
        &self,
        _brief: &CreativeBrief,
        concept: &Concept,
    ) -> GenerationResult<RenderedVideo> {
        debug!(concept_id = concept.id, "Mock video rendering");
        tokio::time::sleep(self.render_latency).await;
        Ok(RenderedVideo {
            video_url: SAMPLE_VIDEO_URL.to_string(),
            thumbnail_url: SAMPLE_THUMBNAIL_URL.to_string(),
        })
    }
}

struct SceneTemplate {
    title: &'static str,
    description: &'static str,
}

/// The three canned concepts for a brief.
///
/// Every concept has four contiguous scenes covering `[0, length]`.
pub fn canned_concepts(brief: &CreativeBrief) -> Vec<Concept> {
    let length = brief.length_secs.max(MIN_LENGTH_SECS);
    let description = &brief.description;

    vec![
        build_concept(
            1,
            "感情重視アプローチ",
            "視聴者の感情に訴えかける構成で、ブランドとの深いつながりを創出",
            format!("{description}を通じて、視聴者の心に響く物語を紡ぎます。感情的なつながりを重視し、ブランドの価値を深く伝える構成です。"),
            "エモーショナル・ピアノ",
            [8, 18, 25],
            length,
            [
                SceneTemplate { title: "オープニング", description: "視聴者の注意を引く印象的な導入" },
                SceneTemplate { title: "問題提起", description: "ターゲットが抱える課題を明確化" },
                SceneTemplate { title: "解決策提示", description: "商品・サービスによる解決方法" },
                SceneTemplate { title: "クロージング", description: "行動を促す力強い結び" },
            ],
            [
                format!("「{}」のブランドロゴと共に、印象的なビジュアルで視聴者の関心を引きつけます", brief.title),
                format!("{}が日常で感じる課題や悩みを具体的に描写します", brief.target_audience),
                "あなたの商品がどのように問題を解決するかを分かりやすく説明します".to_string(),
                "視聴者に具体的なアクションを促す、印象に残るメッセージで締めくくります".to_string(),
            ],
        ),
        build_concept(
            2,
            "ストーリーテリング",
            "物語性を重視した構成で、記憶に残る印象的な動画を制作",
            format!("物語の力を活用して{description}を魅力的に伝えます。視聴者が自然と引き込まれる構成で、ブランドメッセージを効果的に届けます。"),
            "シネマティック・オーケストラ",
            [7, 16, 24],
            length,
            [
                SceneTemplate { title: "導入シーン", description: "物語の舞台設定と主人公登場" },
                SceneTemplate { title: "展開", description: "主人公の課題と成長の過程" },
                SceneTemplate { title: "クライマックス", description: "商品との出会いと変化" },
                SceneTemplate { title: "エンディング", description: "希望に満ちた未来への展望" },
            ],
            [
                format!("「{}」の世界観を設定し、{}が共感できる主人公を登場させます", brief.title, brief.target_audience),
                "主人公が直面する課題と、それを乗り越えていく過程を描きます".to_string(),
                "あなたの商品・サービスとの出会いによる劇的な変化を表現します".to_string(),
                "商品によって実現される明るい未来を印象的に描写します".to_string(),
            ],
        ),
        build_concept(
            3,
            "データドリブン",
            "具体的な数値と実績を活用した信頼性重視の構成",
            format!("データと実績に基づいて{description}の価値を証明します。具体的な数値と事実で説得力のあるメッセージを構築します。"),
            "モダン・エレクトロニック",
            [8, 17, 25],
            length,
            [
                SceneTemplate { title: "現状分析", description: "市場データと課題の可視化" },
                SceneTemplate { title: "実績紹介", description: "具体的な成果と顧客の声" },
                SceneTemplate { title: "比較優位", description: "競合との明確な差別化" },
                SceneTemplate { title: "ROI提示", description: "投資対効果の具体的な提示" },
            ],
            [
                "業界の現状と課題を具体的なデータで示し、問題の重要性を伝えます".to_string(),
                "これまでの実績と顧客満足度を数値で示し、信頼性を構築します".to_string(),
                "他社との比較データを用いて、あなたの商品の優位性を明確に示します".to_string(),
                format!("{}にとっての具体的なメリットとROIを数値で分かりやすく提示します", brief.target_audience),
            ],
        ),
    ]
}

#[allow(clippy::too_many_arguments)]
fn build_concept(
    id: u32,
    title: &str,
    description: &str,
    script: String,
    bgm: &str,
    reference_cuts: [u32; 3],
    length: u32,
    templates: [SceneTemplate; 4],
    contents: [String; 4],
) -> Concept {
    let cuts = scale_cuts(reference_cuts, length);
    let bounds = [0, cuts[0], cuts[1], cuts[2], length];

    let scenes = templates
        .into_iter()
        .zip(contents)
        .enumerate()
        .map(|(i, (template, content))| {
            Scene::new(
                i as u32 + 1,
                template.title,
                template.description,
                bounds[i],
                bounds[i + 1],
                content,
            )
        })
        .collect();

    Concept {
        id,
        title: title.to_string(),
        description: description.to_string(),
        script,
        bgm: bgm.to_string(),
        scenes,
        media_files: Vec::new(),
    }
}

/// Scale the interior cut points from the reference length to `length`.
///
/// Cuts are rounded, then clamped so every scene keeps at least one second.
/// `length` must be at least [`MIN_LENGTH_SECS`].
fn scale_cuts(reference: [u32; 3], length: u32) -> [u32; 3] {
    let mut cuts = [0u32; 3];
    let mut prev = 0;
    for (i, cut) in reference.iter().enumerate() {
        let scaled = (u64::from(*cut) * u64::from(length) + u64::from(REFERENCE_LENGTH_SECS / 2))
            / u64::from(REFERENCE_LENGTH_SECS);
        let scaled = u32::try_from(scaled).unwrap_or(u32::MAX);
        let lo = prev + 1;
        let hi = length - (reference.len() - i) as u32;
        cuts[i] = scaled.clamp(lo, hi);
        prev = cuts[i];
    }
    cuts
}

#[cfg(test)]
mod tests {
    use super::*;

    fn brief(length_secs: u32) -> CreativeBrief {
        CreativeBrief {
            title: "新商品の魅力を伝える動画".to_string(),
            description: "新商品ローンチ".to_string(),
            target_audience: "20-30代の働く女性".to_string(),
            length_secs,
            model: "basic".to_string(),
        }
    }

    fn bounds(concept: &Concept) -> Vec<(u32, u32)> {
        concept.scenes.iter().map(|s| (s.start_time, s.end_time)).collect()
    }

    #[test]
    fn test_reference_layout_for_30_seconds() {
        let concepts = canned_concepts(&brief(30));
        assert_eq!(bounds(&concepts[0]), vec![(0, 8), (8, 18), (18, 25), (25, 30)]);
        assert_eq!(bounds(&concepts[1]), vec![(0, 7), (7, 16), (16, 24), (24, 30)]);
        assert_eq!(bounds(&concepts[2]), vec![(0, 8), (8, 17), (17, 25), (25, 30)]);
    }

    #[test]
    fn test_scaled_layouts_stay_contiguous() {
        for length in [4, 5, 7, 15, 29, 60, 90, 600, 200_000_000, u32::MAX] {
            for concept in canned_concepts(&brief(length)) {
                assert_eq!(concept.scenes.len(), 4);
                assert!(concept.validate_timeline().is_ok(), "length={length}");
                assert_eq!(concept.total_duration(), length);
            }
        }
    }

    #[test]
    fn test_very_long_brief_keeps_proportions() {
        let concepts = canned_concepts(&brief(u32::MAX));
        let cuts: Vec<u32> = concepts[0].scenes.iter().map(|s| s.end_time).collect();
        let expected = |cut: u64| ((cut * u64::from(u32::MAX) + 15) / 30) as u32;
        assert_eq!(cuts, vec![expected(8), expected(18), expected(25), u32::MAX]);
    }

    #[test]
    fn test_short_lengths_are_raised() {
        let concepts = canned_concepts(&brief(1));
        assert_eq!(concepts[0].total_duration(), MIN_LENGTH_SECS);
        assert_eq!(bounds(&concepts[0]), vec![(0, 1), (1, 2), (2, 3), (3, 4)]);
    }

    #[test]
    fn test_content_interpolates_brief() {
        let concepts = canned_concepts(&brief(30));
        assert!(concepts[0].script.contains("新商品ローンチ"));
        assert!(concepts[0].scenes[0].content.contains("新商品の魅力を伝える動画"));
        assert!(concepts[0].scenes[1].content.contains("20-30代の働く女性"));
        assert_eq!(concepts[2].bgm, "モダン・エレクトロニック");
    }

    #[tokio::test]
    async fn test_instant_studio() {
        let studio = MockStudio::instant();
        let concepts = studio.generate_concepts(&brief(30)).await.unwrap();
        assert_eq!(concepts.len(), 3);

        let video = studio.render_video(&brief(30), &concepts[0]).await.unwrap();
        assert!(video.video_url.ends_with(".mp4"));
    }
}
