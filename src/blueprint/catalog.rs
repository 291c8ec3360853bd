use crate::llm::ChatModel;
use crate::models::blueprint::{ ModelOption, NodeType, ProjectTemplate, QuickAction, TemplateNode };

fn nodes(items: &[(NodeType, &'static str)]) -> Vec<TemplateNode> {
    items
        .iter()
        .map(|&(node_type, content)| TemplateNode { node_type, content })
        .collect()
}

pub fn project_templates() -> Vec<ProjectTemplate> {
    use NodeType::*;

    vec![
        ProjectTemplate {
            id: "game-app",
            title: "Game App",
            description: "Build an interactive game",
            icon: "🎮",
            color: "#8b5cf6",
            default_title: "My Game App",
            default_summary: "A fun, interactive game application",
            nodes: nodes(
                &[
                    (Title, "Game App - Your Game Name"),
                    (Planning, "Phase 1: UI design\nPhase 2: Game logic\nPhase 3: Sound & animation"),
                    (Feature, "Score display\nGame levels\nLeaderboard"),
                    (Idea, "Play a sound on win\nConfetti animation\nShare score to social media"),
                    (Technical, "React/Next.js\nCanvas for graphics\nLocal storage for scores"),
                ]
            ),
        },
        ProjectTemplate {
            id: "mobile-app",
            title: "Mobile App",
            description: "Build a smartphone application",
            icon: "📱",
            color: "#3b82f6",
            default_title: "My Mobile App",
            default_summary: "A mobile app that solves everyday problems",
            nodes: nodes(
                &[
                    (Title, "Mobile App - Your App Name"),
                    (Planning, "Phase 1: Wireframe\nPhase 2: UI design\nPhase 3: Development\nPhase 4: Testing"),
                    (Feature, "User login\nDashboard\nNotifications\nUser profile"),
                    (Technical, "React Native / Flutter\nFirebase backend\nPush notifications"),
                    (Api, "Auth API\nUser API\nData API"),
                    (Database, "Users collection\nData collection\nSettings collection"),
                ]
            ),
        },
        ProjectTemplate {
            id: "school-website",
            title: "School Website",
            description: "Build a website for a school",
            icon: "🏫",
            color: "#10b981",
            default_title: "My School Website",
            default_summary: "Official school website with complete information",
            nodes: nodes(
                &[
                    (Title, "School Website - School Name"),
                    (Planning, "Home page\nAbout us\nGallery\nContact us\nNews"),
                    (Feature, "Image slider\nEvent calendar\nOnline registration\nPhoto gallery"),
                    (Idea, "Student portal\nAttendance system\nExam results page"),
                    (Technical, "Next.js\nTailwind CSS\nFirebase/Supabase"),
                ]
            ),
        },
        ProjectTemplate {
            id: "online-store",
            title: "Online Store",
            description: "Build an e-commerce platform",
            icon: "🛒",
            color: "#f59e0b",
            default_title: "My Online Store",
            default_summary: "A complete online buying and selling platform",
            nodes: nodes(
                &[
                    (Title, "Online Store - Store Name"),
                    (Planning, "Product catalog\nShopping cart\nCheckout\nPayment\nShipping"),
                    (Feature, "Product search\nCategory filter\nWishlist\nProduct reviews"),
                    (Idea, "Automatic discounts\nLoyalty program\nLive chat support"),
                    (Api, "Product API\nOrder API\nPayment Gateway\nShipping API"),
                    (Database, "Products\nOrders\nUsers\nReviews\nCategories"),
                ]
            ),
        },
        ProjectTemplate {
            id: "learning-app",
            title: "Learning App",
            description: "Build an app for studying",
            icon: "📚",
            color: "#ec4899",
            default_title: "My Learning App",
            default_summary: "An interactive app that helps people learn",
            nodes: nodes(
                &[
                    (Title, "Learning App - Subject"),
                    (Planning, "Learning modules\nInteractive quizzes\nProgress tracking\nAchievement badges"),
                    (Feature, "Video lessons\nInteractive exercises\nDigital notes\nFlashcards"),
                    (Idea, "AI tutor\nGamification\nWeekly competitions\nCertificate"),
                    (Technical, "React/Next.js\nVideo streaming\nProgress database"),
                ]
            ),
        },
        ProjectTemplate {
            id: "blank",
            title: "Blank Project",
            description: "Start from scratch",
            icon: "✨",
            color: "#64748b",
            default_title: "",
            default_summary: "",
            nodes: Vec::new(),
        }
    ]
}

pub fn find_template(id: &str) -> Option<ProjectTemplate> {
    project_templates().into_iter().find(|t| t.id == id)
}

pub fn quick_actions() -> Vec<QuickAction> {
    vec![
        QuickAction {
            id: "analyze",
            label: "Analyse Project",
            icon: "🔍",
            prompt: "Analyse my project and give an overall assessment. Is it feasible? What are its strengths and weaknesses?",
        },
        QuickAction {
            id: "suggest",
            label: "Suggest Features",
            icon: "💡",
            prompt: "Based on my project, suggest 5 additional features that would make it better.",
        },
        QuickAction {
            id: "missing",
            label: "What's Missing?",
            icon: "❓",
            prompt: "What might I have missed in planning this project? Is anything critical left out?",
        },
        QuickAction {
            id: "next-steps",
            label: "Next Steps",
            icon: "🚀",
            prompt: "Give me the next steps to start building this project, listed in priority order.",
        },
        QuickAction {
            id: "tech-stack",
            label: "Tech Stack",
            icon: "⚙️",
            prompt: "Recommend the best tech stack for this project. Explain why each choice fits.",
        },
        QuickAction {
            id: "timeline",
            label: "Time Estimate",
            icon: "⏱️",
            prompt: "Give a realistic time estimate for finishing this project, broken down by phase.",
        }
    ]
}

pub fn model_options() -> Vec<ModelOption> {
    [ChatModel::Claude, ChatModel::Codex, ChatModel::DeepSeek]
        .into_iter()
        .map(|model| match model {
            ChatModel::Claude => ModelOption {
                id: model.as_str(),
                name: "Claude",
                icon: "🟣",
                color: "#8b5cf6",
                description: "Creative & detailed",
            },
            ChatModel::Codex => ModelOption {
                id: model.as_str(),
                name: "Codex",
                icon: "🟢",
                color: "#10b981",
                description: "Code focused",
            },
            ChatModel::DeepSeek => ModelOption {
                id: model.as_str(),
                name: "DeepSeek",
                icon: "🔵",
                color: "#3b82f6",
                description: "Fast & efficient",
            },
        })
        .collect()
}
