//! Terminal rendering of an analysis report.

use cupofdata_extract::{compose_lines, AnalysisReport};

pub(crate) fn no_articles(brand: &str, board: &str) -> String {
    format!("{board} 看板最近沒有標題提到「{brand}」的文章。")
}

pub(crate) fn render_report(report: &AnalysisReport) -> Vec<String> {
    let rec = &report.recommendation;
    let mut lines = vec![
        format!(
            "【{}】分析 {} 篇文章（略過 {} 篇），共 {} 次提及",
            rec.brand, report.documents_processed, report.documents_skipped, rec.total_mentions
        ),
        String::new(),
        rec.primary_sentence.clone(),
    ];
    lines.extend(rec.secondary_sentences.iter().cloned());

    if !rec.ranked_stats.is_empty() {
        lines.push(String::new());
        lines.push("熱門飲品：".to_string());
        lines.extend(
            compose_lines(&rec.ranked_stats)
                .into_iter()
                .enumerate()
                .map(|(i, line)| format!("  {}. {line}", i + 1)),
        );
    }

    lines.push(String::new());
    lines.push(format!("AI 摘要：{}", report.prose_summary));
    lines
}

#[cfg(test)]
mod tests {
    use cupofdata_core::{DrinkStat, Recommendation};

    use super::*;

    fn report(ranked_stats: Vec<DrinkStat>) -> AnalysisReport {
        AnalysisReport {
            recommendation: Recommendation {
                brand: "五十嵐".to_string(),
                total_mentions: 3,
                ranked_stats,
                primary_sentence: "最多人推薦 五十嵐 的「紅茶」！".to_string(),
                secondary_sentences: vec![],
            },
            prose_summary: "（AI 摘要暫不可用）".to_string(),
            documents_processed: 2,
            documents_skipped: 1,
        }
    }

    #[test]
    fn report_lists_ranked_drinks() {
        let mut stat = DrinkStat::new("紅茶");
        stat.mention_count = 2;
        stat.vote_ice("去冰");
        let lines = render_report(&report(vec![stat]));
        assert_eq!(lines[0], "【五十嵐】分析 2 篇文章（略過 1 篇），共 3 次提及");
        assert!(lines.contains(&"  1. 紅茶（去冰） — 2 篇提到".to_string()));
        assert_eq!(lines.last().unwrap(), "AI 摘要：（AI 摘要暫不可用）");
    }

    #[test]
    fn empty_report_has_no_ranking_block() {
        let lines = render_report(&report(vec![]));
        assert!(!lines.iter().any(|l| l == "熱門飲品："));
    }

    #[test]
    fn no_articles_names_brand_and_board() {
        assert_eq!(
            no_articles("五十嵐", "Drink"),
            "Drink 看板最近沒有標題提到「五十嵐」的文章。"
        );
    }
}
