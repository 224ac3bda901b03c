use chrono::NaiveDate;
use dioxus::prelude::*;

use herdwatch_common::{Phase, RiskAssessment, ScenarioParams};
use herdwatch_engine::MonthlyCount;

use super::layout::Layout;
use crate::templates::render_to_html;

/// Everything the initial server-side render needs. The page script
/// refetches the JSON endpoints afterwards, so this is a starting
/// state, not a contract.
#[derive(Clone, PartialEq)]
pub struct DashboardData {
    pub record_count: usize,
    pub min_date: NaiveDate,
    pub max_date: NaiveDate,
    pub regions: Vec<String>,
    pub scenario: ScenarioParams,
    pub subset_size: usize,
    pub assessment: RiskAssessment,
    pub monthly: Vec<MonthlyCount>,
}

fn phase_color(phase: Phase) -> &'static str {
    match phase {
        Phase::Latent => "#2e7d32",
        Phase::Early => "#e65100",
        Phase::Diffusion => "#c62828",
    }
}

// --- Chart.js JSON builders ---

pub fn build_monthly_chart(monthly: &[MonthlyCount]) -> String {
    let labels: Vec<String> = monthly.iter().map(|m| m.month.to_string()).collect();
    let counts: Vec<u64> = monthly.iter().map(|m| m.count).collect();

    format!(
        r#"window.trendChart=new Chart(document.getElementById('chart-monthly'),{{type:'line',data:{{labels:{labels},datasets:[{{label:'Outbreaks',data:{counts},borderColor:'#1565c0',backgroundColor:'rgba(21,101,192,0.1)',tension:0.3,fill:true}}]}},options:{{responsive:true,plugins:{{legend:{{display:false}}}},scales:{{y:{{beginAtZero:true,ticks:{{precision:0}}}}}}}}}});"#,
        labels = serde_json::to_string(&labels).unwrap_or_default(),
        counts = serde_json::to_string(&counts).unwrap_or_default(),
    )
}

// --- Page script ---

const PAGE_SCRIPT: &str = r#"
const map = L.map('map').setView([30.0, 60.0], 2);
L.tileLayer('https://{s}.tile.openstreetmap.org/{z}/{x}/{y}.png', {
    attribution: '&copy; OpenStreetMap contributors',
    maxZoom: 18,
}).addTo(map);

const regionColors = { Asia: '#c62828', Europe: '#1565c0', Africa: '#e65100', Americas: '#2e7d32', Oceania: '#7b1fa2' };
const phaseNames = { latent: 'Latent', early: 'Early', diffusion: 'Diffusion' };
const phaseColors = { latent: '#2e7d32', early: '#e65100', diffusion: '#c62828' };
let markers = L.layerGroup().addTo(map);

function scenarioQuery() {
    const cutoff = document.getElementById('cutoff').value;
    const regions = Array.from(document.querySelectorAll('input[name=region]:checked')).map(el => el.value);
    const enhanced = document.getElementById('enhanced').checked;
    return `cutoff=${cutoff}&regions=${encodeURIComponent(regions.join(','))}&enhanced=${enhanced}`;
}

function loadMarkers() {
    fetch(`/api/records?${scenarioQuery()}`)
        .then(r => r.json())
        .then(data => {
            markers.clearLayers();
            (data.features || []).forEach(f => {
                const p = f.properties;
                const [lng, lat] = f.geometry.coordinates;
                const color = regionColors[p.region] || '#999';
                const m = L.circleMarker([lat, lng], {
                    radius: 6, fillColor: color, color: '#fff', weight: 1, fillOpacity: 0.85
                });
                const detail = [p.occurred_on, p.species, p.cases ? p.cases + ' cases' : null]
                    .filter(Boolean).join(' · ');
                m.bindPopup(`<strong>${p.country || p.region}</strong><br><span style="font-size:12px;color:#555">${detail}</span>`);
                markers.addLayer(m);
            });
        });
}

function refreshAssessment() {
    fetch(`/api/assess?${scenarioQuery()}`)
        .then(r => r.json())
        .then(data => {
            const a = data.assessment;
            const enhanced = data.scenario.enhanced;
            document.getElementById('agent-label').textContent = enhanced ? 'Agent B (LLM-enhanced)' : 'Agent A (baseline)';
            document.getElementById('score-value').textContent = (enhanced ? a.enhanced_score : a.baseline_score).toFixed(1) + ' %';
            document.getElementById('score-delta').textContent = enhanced ? '+' + data.improvement.toFixed(1) + ' %p over baseline' : '';
            document.getElementById('phase-value').textContent = enhanced ? (phaseNames[a.phase] || a.phase) : '—';
            document.getElementById('phase-index').textContent = enhanced ? a.phase_index.toFixed(1) + ' / 10' : 'Enable enhancement for the phase diagnosis.';
            const advice = document.getElementById('advice');
            advice.textContent = enhanced ? a.enhanced_advice : a.baseline_advice;
            advice.style.borderLeftColor = phaseColors[a.phase] || '#999';
            document.getElementById('subset-count').textContent = `${data.subset_size} records as of ${data.scenario.cutoff}`;
            document.getElementById('empty-note').style.display = data.subset_size === 0 ? 'block' : 'none';
        });
}

function refreshMonthly() {
    fetch(`/api/monthly?${scenarioQuery()}`)
        .then(r => r.json())
        .then(data => {
            window.trendChart.data.labels = data.months.map(m => m.month);
            window.trendChart.data.datasets[0].data = data.months.map(m => m.count);
            window.trendChart.update();
        });
}

function refreshAll() {
    refreshAssessment();
    refreshMonthly();
    loadMarkers();
}

document.getElementById('cutoff').addEventListener('change', refreshAll);
document.getElementById('enhanced').addEventListener('change', refreshAll);
document.querySelectorAll('input[name=region]').forEach(el => el.addEventListener('change', refreshAll));

loadMarkers();
"#;

// --- Page ---

#[allow(non_snake_case)]
#[component]
fn Dashboard(data: DashboardData) -> Element {
    let min = data.min_date.to_string();
    let max = data.max_date.to_string();
    let cutoff = data.scenario.cutoff.to_string();
    let enhanced = data.scenario.enhanced;

    let assessment = &data.assessment;
    let agent_label = if enhanced { "Agent B (LLM-enhanced)" } else { "Agent A (baseline)" };
    let shown_score = if enhanced {
        assessment.enhanced_score
    } else {
        assessment.baseline_score
    };
    let score = format!("{:.1} %", shown_score);
    let delta = if enhanced {
        format!("+{:.1} %p over baseline", assessment.improvement())
    } else {
        String::new()
    };
    let phase_label = if enhanced {
        assessment.phase.to_string()
    } else {
        "—".to_string()
    };
    let phase_index = if enhanced {
        format!("{:.1} / 10", assessment.phase_index)
    } else {
        "Enable enhancement for the phase diagnosis.".to_string()
    };
    let advice = if enhanced {
        assessment.enhanced_advice.clone()
    } else {
        assessment.baseline_advice.clone()
    };
    let advice_style = format!("border-left-color:{}", phase_color(assessment.phase));
    let count_line = format!("{} records as of {}", data.subset_size, cutoff);
    let empty_style = if data.subset_size == 0 {
        "display:block"
    } else {
        "display:none"
    };
    let subtitle = format!(
        "Lumpy Skin Disease case study · {} records · {} to {}",
        data.record_count, min, max
    );

    let chart_script = build_monthly_chart(&data.monthly);

    rsx! {
        Layout { title: "Dashboard".to_string(), active_page: "dashboard".to_string(),
            div { class: "p-6 max-w-6xl mx-auto space-y-6",
                div {
                    h1 { class: "text-xl font-semibold", "Early-warning briefing" }
                    p { class: "text-sm text-gray-500", "{subtitle}" }
                }

                // Scenario controls
                div { class: "bg-white rounded-lg shadow p-4 flex flex-wrap items-end gap-6",
                    div {
                        label { class: "block text-xs text-gray-500 mb-1", r#for: "cutoff",
                            "Simulated \"today\""
                        }
                        input {
                            id: "cutoff",
                            r#type: "date",
                            class: "border rounded px-2 py-1 text-sm",
                            min: "{min}",
                            max: "{max}",
                            value: "{cutoff}",
                        }
                    }
                    div {
                        span { class: "block text-xs text-gray-500 mb-1", "Regions" }
                        div { class: "flex flex-wrap gap-3",
                            for region in data.regions.iter() {
                                {
                                    let checked = data.scenario.regions.iter().any(|r| r == region);
                                    let value = region.clone();
                                    rsx! {
                                        label { class: "flex items-center gap-1 text-sm",
                                            input { r#type: "checkbox", name: "region", value: "{value}", checked: checked }
                                            "{value}"
                                        }
                                    }
                                }
                            }
                        }
                    }
                    label { class: "flex items-center gap-2 text-sm",
                        input { id: "enhanced", r#type: "checkbox", checked: enhanced }
                        "LLM context enhancement (Agent B)"
                    }
                }

                // Briefing panels: prediction / diagnosis / action
                div { class: "grid grid-cols-1 md:grid-cols-3 gap-4",
                    div { class: "bg-white rounded-lg shadow p-4",
                        h2 { class: "text-sm font-semibold mb-2", "Introduction risk" }
                        p { id: "agent-label", class: "text-xs text-gray-500", "{agent_label}" }
                        p { id: "score-value", class: "text-3xl font-semibold", "{score}" }
                        p { id: "score-delta", class: "text-xs text-green-700", "{delta}" }
                    }
                    div { class: "bg-white rounded-lg shadow p-4",
                        h2 { class: "text-sm font-semibold mb-2", "Phase diagnosis" }
                        p { id: "phase-value", class: "text-3xl font-semibold", "{phase_label}" }
                        p { id: "phase-index", class: "text-xs text-gray-500", "{phase_index}" }
                    }
                    div { class: "bg-white rounded-lg shadow p-4",
                        h2 { class: "text-sm font-semibold mb-2", "Recommended action" }
                        p {
                            id: "advice",
                            class: "text-sm border-l-4 pl-3",
                            style: "{advice_style}",
                            "{advice}"
                        }
                    }
                }

                // Map + monthly trend
                div { class: "grid grid-cols-1 lg:grid-cols-2 gap-4",
                    div { class: "bg-white rounded-lg shadow p-4",
                        h2 { class: "text-sm font-semibold mb-2", "Global spread map" }
                        div { id: "map", class: "h-96 rounded" }
                    }
                    div { class: "bg-white rounded-lg shadow p-4",
                        h2 { class: "text-sm font-semibold mb-2", "Monthly outbreak trend" }
                        canvas { id: "chart-monthly" }
                    }
                }

                p { id: "subset-count", class: "text-xs text-gray-500", "{count_line}" }
                p {
                    id: "empty-note",
                    class: "text-sm text-amber-700",
                    style: "{empty_style}",
                    "No data for this selection."
                }
            }
            script { src: "https://unpkg.com/leaflet@1.9.4/dist/leaflet.js" }
            script { src: "https://cdn.jsdelivr.net/npm/chart.js" }
            script { dangerous_inner_html: chart_script }
            script { dangerous_inner_html: PAGE_SCRIPT }
        }
    }
}

pub fn render_dashboard(data: DashboardData) -> String {
    let mut dom = VirtualDom::new_with_props(Dashboard, DashboardProps { data });
    dom.rebuild_in_place();
    render_to_html(&dom)
}
